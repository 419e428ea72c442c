use crate::field::{self, Coerced, FieldKind};
use sheetbind_common::CellValue;

/// Converts a non-blank cell (and its text form) into a field value.
/// `Ok(None)` leaves the field at its default.
pub type Coercer = fn(&CellValue, &str) -> Coerced;

impl FieldKind {
    /// The coercion applied to every cell bound to a field of this kind.
    pub fn coercer(self) -> Coercer {
        match self {
            FieldKind::Text => field::coerce_text,
            FieldKind::Integer => field::coerce_integer,
            FieldKind::Long => field::coerce_long,
            FieldKind::Float => field::coerce_float,
            FieldKind::Short => field::coerce_short,
            FieldKind::Double => field::coerce_double,
            FieldKind::Char => field::coerce_char,
            FieldKind::DateTime => field::coerce_date_time,
            FieldKind::Decimal => field::coerce_decimal,
        }
    }
}

/// One marked field: where its data comes from and how it is converted.
#[derive(Debug, Clone, Copy)]
pub struct FieldBinding {
    sequence: usize,
    name: &'static str,
    kind: FieldKind,
    coerce: Coercer,
}

impl FieldBinding {
    /// 1-based; also the column the field reads (1 = A).
    pub fn sequence(&self) -> usize {
        self.sequence
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn coerce(&self, cell: &CellValue, text: &str) -> Coerced {
        (self.coerce)(cell, text)
    }
}

/// The ordered column bindings of a record type.
///
/// Built once per type (the derive caches it in a static) and read-only
/// afterwards.
#[derive(Debug, Clone)]
pub struct RecordBindings {
    record: &'static str,
    fields: Vec<FieldBinding>,
}

impl RecordBindings {
    /// Number `fields` 1, 2, 3, ... in iteration order.
    pub fn new<I>(record: &'static str, fields: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, FieldKind)>,
    {
        let fields = fields
            .into_iter()
            .enumerate()
            .map(|(i, (name, kind))| FieldBinding {
                sequence: i + 1,
                name,
                kind,
                coerce: kind.coercer(),
            })
            .collect();
        Self { record, fields }
    }

    pub fn record(&self) -> &'static str {
        self.record
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, sequence: usize) -> Option<&FieldBinding> {
        sequence.checked_sub(1).and_then(|i| self.fields.get(i))
    }

    /// Bindings in ascending sequence order.
    pub fn iter(&self) -> std::slice::Iter<'_, FieldBinding> {
        self.fields.iter()
    }
}

impl<'a> IntoIterator for &'a RecordBindings {
    type Item = &'a FieldBinding;
    type IntoIter = std::slice::Iter<'a, FieldBinding>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
