use super::StructuralHintProvider;

/// Provider with no structural knowledge.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStructuralHints;

impl StructuralHintProvider for NullStructuralHints {
    fn is_repeating(&self, _resource_type: &str, _property_path: &str) -> bool {
        false
    }

    fn is_reference(&self, _resource_type: &str, _property_path: &str) -> bool {
        false
    }
}
