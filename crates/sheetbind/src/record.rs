use crate::binding::RecordBindings;
use crate::error::AssignError;
use crate::field::{CellField, FieldKind, FieldValue};

/// A type whose instances are built from spreadsheet rows.
///
/// Implement with `#[derive(SheetRecord)]`. Records start from `Default`
/// and only the fields that receive a non-blank cell are overwritten.
pub trait SheetRecord: Default {
    /// Column bindings of the type, in sequence order.
    fn bindings() -> &'static RecordBindings;

    /// Store `value` in the field bound to `sequence`.
    fn assign(&mut self, sequence: usize, value: FieldValue) -> Result<(), AssignError>;
}

/// Store `value` into `slot` if its kind matches the slot's type.
pub fn assign_field<F: CellField>(slot: &mut F, value: FieldValue) -> Result<(), AssignError> {
    let found: FieldKind = value.kind();
    match F::from_field_value(value) {
        Some(v) => {
            *slot = v;
            Ok(())
        }
        None => Err(AssignError::KindMismatch {
            expected: F::KIND,
            found,
        }),
    }
}
