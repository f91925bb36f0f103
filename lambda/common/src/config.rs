use lambda_http::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionConfig {
    pub collection_name: String,
}

impl CollectionConfig {
    pub fn new(collection_name: impl Into<String>) -> Self {
        Self {
            collection_name: collection_name.into(),
        }
    }

    pub fn from_env(var: &str) -> Result<Self, Error> {
        match std::env::var(var) {
            Ok(name) if !name.trim().is_empty() => Ok(Self::new(name)),
            _ => Err(Error::from(format!("{var} not set"))),
        }
    }
}
