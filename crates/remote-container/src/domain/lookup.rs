//! Module lookup results
//!
//! A lookup either finds nothing, returns the whole module, or picks one
//! export out of it. Which one is decided by whether an export name was
//! requested and whether the module value supports keyed access.

use shared_types::ModuleValue;

/// Outcome of `get_module`.
#[derive(Debug, Clone, PartialEq)]
pub enum ModuleLookup {
    /// The container does not expose the module.
    Missing,
    /// No export requested: the module value itself.
    Whole(ModuleValue),
    /// One named export. `None` when the export is absent or the module
    /// value is not keyed (primitive or null).
    Export {
        name: String,
        value: Option<ModuleValue>,
    },
}

impl ModuleLookup {
    /// Build the lookup result for a resolved module value.
    #[must_use]
    pub fn from_module(module: ModuleValue, export_name: Option<&str>) -> Self {
        let Some(name) = export_name else {
            return Self::Whole(module);
        };

        let value = match module {
            ModuleValue::Object(mut exports) => exports.remove(name),
            // Arrays are keyed by index
            ModuleValue::Array(items) => name
                .parse::<usize>()
                .ok()
                .and_then(|index| items.into_iter().nth(index)),
            _ => None,
        };

        Self::Export {
            name: name.to_string(),
            value,
        }
    }

    /// Collapse to the value, `None` standing for "undefined".
    #[must_use]
    pub fn into_value(self) -> Option<ModuleValue> {
        match self {
            Self::Missing => None,
            Self::Whole(value) => Some(value),
            Self::Export { value, .. } => value,
        }
    }

    #[must_use]
    pub fn value(&self) -> Option<&ModuleValue> {
        match self {
            Self::Missing => None,
            Self::Whole(value) => Some(value),
            Self::Export { value, .. } => value.as_ref(),
        }
    }

    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}
