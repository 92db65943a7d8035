use crate::config::ModelEntry;

/// Display label to provider model id. The first entry is the default.
pub const BUILTIN_MODELS: &[(&str, &str)] = &[
    ("GPT-4o mini", "gpt-4o-mini"),
    ("GPT-4o", "chatgpt-4o-latest"),
    ("GPT-4 Turbo", "gpt-4-turbo"),
    ("GPT-3.5 Turbo", "gpt-3.5-turbo"),
    ("o1", "o1"),
    ("o1-mini", "o1-mini"),
];

/// Model ids that reject a `temperature` parameter.
pub const NO_TEMPERATURE_MODELS: &[&str] = &["o1", "o1-mini", "o1-preview", "o3-mini"];

pub fn accepts_temperature(id: &str) -> bool {
    !NO_TEMPERATURE_MODELS.contains(&id)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelSpec {
    pub label: String,
    pub id: String,
    pub supports_temperature: bool,
}

impl ModelSpec {
    pub fn new(label: &str, id: &str) -> Self {
        Self {
            label: label.to_string(),
            id: id.to_string(),
            supports_temperature: accepts_temperature(id),
        }
    }

    pub fn menu_label(&self) -> String {
        if self.supports_temperature {
            format!("{} ({})", self.label, self.id)
        } else {
            format!("{} ({}, fixed temperature)", self.label, self.id)
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModelCatalog {
    models: Vec<ModelSpec>,
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self {
            models: BUILTIN_MODELS
                .iter()
                .map(|(label, id)| ModelSpec::new(label, id))
                .collect(),
        }
    }
}

impl ModelCatalog {
    /// Built-in table followed by configured entries. An entry whose id is
    /// already listed replaces the built-in one in place.
    pub fn with_extras(extras: &[ModelEntry]) -> Self {
        let mut catalog = Self::default();
        for entry in extras {
            let spec = ModelSpec {
                label: entry.label.clone(),
                id: entry.id.clone(),
                supports_temperature: entry.temperature && accepts_temperature(&entry.id),
            };
            match catalog.models.iter_mut().find(|m| m.id == spec.id) {
                Some(existing) => *existing = spec,
                None => catalog.models.push(spec),
            }
        }
        catalog
    }

    pub fn models(&self) -> &[ModelSpec] {
        &self.models
    }

    pub fn get(&self, idx: usize) -> Option<&ModelSpec> {
        self.models.get(idx)
    }

    /// Look a model up by id, or by label ignoring case.
    pub fn find(&self, key: &str) -> Option<&ModelSpec> {
        self.models
            .iter()
            .find(|m| m.id == key)
            .or_else(|| self.models.iter().find(|m| m.label.eq_ignore_ascii_case(key)))
    }

    pub fn position(&self, spec: &ModelSpec) -> Option<usize> {
        self.models.iter().position(|m| m.id == spec.id)
    }

    pub fn first(&self) -> &ModelSpec {
        &self.models[0]
    }
}
