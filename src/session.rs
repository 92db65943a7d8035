use crate::config::AppConfig;
use crate::factcheck::{ChatBackend, FactCheckError, ModelCatalog, ModelSpec};

#[derive(Debug, Clone, PartialEq)]
pub enum CredentialState {
    Missing,
    Valid,
    /// Provider's explanation of why the key was refused.
    Invalid(String),
}

/// Everything the user has chosen during one run of the program.
#[derive(Debug, Clone)]
pub struct Session {
    catalog: ModelCatalog,
    model: ModelSpec,
    temperature: f64,
    pub headline: String,
    credential: CredentialState,
}

impl Session {
    pub fn new(catalog: ModelCatalog, default_model: Option<&str>, temperature: f64) -> Self {
        let model = default_model
            .and_then(|key| catalog.find(key))
            .unwrap_or_else(|| catalog.first())
            .clone();
        Self {
            catalog,
            model,
            temperature: temperature.clamp(0.0, 1.0),
            headline: String::new(),
            credential: CredentialState::Missing,
        }
    }

    pub fn from_config(cfg: &AppConfig) -> Self {
        let catalog = ModelCatalog::with_extras(&cfg.models);
        if let Some(key) = cfg.default_model.as_deref() {
            if catalog.find(key).is_none() {
                tracing::warn!(model = key, "unknown default_model, using the first entry");
            }
        }
        Self::new(catalog, cfg.default_model.as_deref(), cfg.temperature)
    }

    /// Probe the provider with the key behind `backend`. A refused key leaves
    /// the session permanently not ready.
    pub async fn validate_credential<B: ChatBackend>(&mut self, backend: &B) -> &CredentialState {
        if matches!(self.credential, CredentialState::Invalid(_)) {
            return &self.credential;
        }
        self.credential = match backend.list_models().await {
            Ok(models) => {
                tracing::info!(available = models.len(), "API key accepted");
                CredentialState::Valid
            }
            Err(err) => {
                tracing::warn!("API key rejected: {}", err);
                CredentialState::Invalid(err.to_string())
            }
        };
        &self.credential
    }

    pub fn credential(&self) -> &CredentialState {
        &self.credential
    }

    pub fn is_ready(&self) -> bool {
        self.credential == CredentialState::Valid
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    pub fn model(&self) -> &ModelSpec {
        &self.model
    }

    pub fn select_model(&mut self, idx: usize) -> Option<&ModelSpec> {
        let spec = self.catalog.get(idx)?.clone();
        self.model = spec;
        Some(&self.model)
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn set_temperature(&mut self, value: f64) -> Result<(), FactCheckError> {
        if !(0.0..=1.0).contains(&value) {
            return Err(FactCheckError::TemperatureOutOfRange(value));
        }
        self.temperature = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factcheck::testing::RecordingBackend;

    fn session() -> Session {
        Session::new(ModelCatalog::default(), None, 0.3)
    }

    #[test]
    fn starts_without_credential_on_first_model() {
        let s = session();
        assert_eq!(s.credential(), &CredentialState::Missing);
        assert!(!s.is_ready());
        assert_eq!(s.model().id, "gpt-4o-mini");
        assert_eq!(s.temperature(), 0.3);
    }

    #[test]
    fn default_model_by_label_or_fallback() {
        let s = Session::new(ModelCatalog::default(), Some("GPT-3.5 Turbo"), 0.3);
        assert_eq!(s.model().id, "gpt-3.5-turbo");
        let s = Session::new(ModelCatalog::default(), Some("unknown"), 0.3);
        assert_eq!(s.model().id, "gpt-4o-mini");
    }

    #[test]
    fn temperature_bounds() {
        let mut s = session();
        assert!(s.set_temperature(1.0).is_ok());
        assert!(s.set_temperature(0.0).is_ok());
        assert!(matches!(
            s.set_temperature(1.2),
            Err(FactCheckError::TemperatureOutOfRange(_))
        ));
        assert_eq!(s.temperature(), 0.0);
    }

    #[test]
    fn select_model_by_index() {
        let mut s = session();
        assert_eq!(s.select_model(4).map(|m| m.id.clone()), Some("o1".into()));
        assert!(s.select_model(99).is_none());
        assert_eq!(s.model().id, "o1");
    }

    #[tokio::test]
    async fn accepted_key_makes_session_ready() {
        let backend = RecordingBackend::replying("ok");
        let mut s = session();
        assert_eq!(s.validate_credential(&backend).await, &CredentialState::Valid);
        assert!(s.is_ready());
        assert_eq!(backend.probes(), 1);
    }

    #[tokio::test]
    async fn refused_key_keeps_provider_detail_and_sticks() {
        let backend = RecordingBackend::unauthorized("Incorrect API key provided");
        let mut s = session();
        s.validate_credential(&backend).await;
        assert_eq!(
            s.credential(),
            &CredentialState::Invalid("unauthorized: Incorrect API key provided".into())
        );
        assert!(!s.is_ready());

        // a later probe does not revive the session
        let good = RecordingBackend::replying("ok");
        s.validate_credential(&good).await;
        assert!(!s.is_ready());
        assert_eq!(good.probes(), 0);
    }
}
