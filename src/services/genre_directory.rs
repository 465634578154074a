use std::collections::BTreeMap;

use crate::{error::AppResult, models::Genre, services::providers::CatalogProvider};

/// Genre id ↔ name lookup, loaded once at startup
#[derive(Debug, Clone, Default)]
pub struct GenreDirectory {
    names: BTreeMap<u64, String>,
}

impl GenreDirectory {
    pub fn new(genres: Vec<Genre>) -> Self {
        Self {
            names: genres.into_iter().map(|g| (g.id, g.name)).collect(),
        }
    }

    /// Fetches the directory from the catalog
    pub async fn load(provider: &dyn CatalogProvider) -> AppResult<Self> {
        let directory = Self::new(provider.genres().await?);

        tracing::info!(
            genres = directory.len(),
            provider = provider.name(),
            "Loaded genre directory"
        );

        Ok(directory)
    }

    pub fn name_of(&self, genre_id: u64) -> Option<&str> {
        self.names.get(&genre_id).map(String::as_str)
    }

    /// Name of a genre, or its id as text when the directory does not know it
    pub fn name_or_id(&self, genre_id: u64) -> String {
        self.name_of(genre_id)
            .map(str::to_string)
            .unwrap_or_else(|| genre_id.to_string())
    }

    /// Id of the first genre (lowest id) with this exact name
    pub fn id_of(&self, name: &str) -> Option<u64> {
        self.names
            .iter()
            .find(|(_, genre_name)| genre_name.as_str() == name)
            .map(|(id, _)| *id)
    }

    pub fn genres(&self) -> Vec<Genre> {
        self.names
            .iter()
            .map(|(id, name)| Genre {
                id: *id,
                name: name.clone(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
