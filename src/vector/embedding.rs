//! Embedding generation for documents and queries.
//!
//! The embedding model is an external capability: text in, fixed-length
//! vector out, deterministic for a fixed model identifier. It is modelled
//! as the [`EmbeddingGenerator`] trait so the indexer and the search engine
//! can be driven by fastembed in production and by deterministic generators
//! in tests.

use std::path::PathBuf;
use std::sync::Mutex;

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

use crate::vector::{VectorDimension, VectorError};

/// Trait for generating embeddings from text.
///
/// Implementations must return exactly one vector per input text, in input
/// order. Callers rely on output `i` describing input `i`.
pub trait EmbeddingGenerator: Send + Sync {
    /// Generate embeddings for multiple texts in one call.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, VectorError>;

    /// Generate the embedding for a single text.
    fn embed(&self, text: &str) -> Result<Vec<f32>, VectorError> {
        self.embed_batch(&[text])?
            .into_iter()
            .next()
            .ok_or_else(|| VectorError::EmbeddingFailed("Model returned no embedding".to_string()))
    }

    /// Dimension of embeddings produced by this generator.
    #[must_use]
    fn dimension(&self) -> VectorDimension;

    /// Identifier of the model behind this generator.
    #[must_use]
    fn model_name(&self) -> &str;
}

/// Calls `embed_batch` and verifies the provider kept its contract.
///
/// The result has one vector per text and every vector has the generator's
/// dimension; anything else is reported as an embedding failure.
pub fn embed_checked(
    generator: &dyn EmbeddingGenerator,
    texts: &[&str],
) -> Result<Vec<Vec<f32>>, VectorError> {
    let embeddings = generator.embed_batch(texts)?;

    if embeddings.len() != texts.len() {
        return Err(VectorError::EmbeddingFailed(format!(
            "Model returned {} embeddings for {} texts",
            embeddings.len(),
            texts.len()
        )));
    }

    let dimension = generator.dimension();
    for (position, embedding) in embeddings.iter().enumerate() {
        if embedding.len() != dimension.get() {
            return Err(VectorError::EmbeddingFailed(format!(
                "Embedding {position} has {} values, expected {dimension}",
                embedding.len()
            )));
        }
    }

    Ok(embeddings)
}

/// Options for loading a fastembed model.
#[derive(Debug, Clone)]
pub struct FastEmbedOptions {
    /// Configured model identifier, e.g. `MultilingualE5Small`.
    pub model_name: String,
    /// Directory where downloaded model files are cached.
    pub cache_dir: PathBuf,
    /// Show a download progress bar the first time a model is fetched.
    pub show_download_progress: bool,
    /// Batch size handed to the model runtime.
    pub batch_size: Option<usize>,
}

/// fastembed-backed generator.
///
/// The model is loaded once when the generator is created and released when
/// it is dropped.
pub struct FastEmbedGenerator {
    model: Mutex<TextEmbedding>,
    model_name: String,
    dimension: VectorDimension,
    batch_size: Option<usize>,
}

impl std::fmt::Debug for FastEmbedGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FastEmbedGenerator")
            .field("model_name", &self.model_name)
            .field("dimension", &self.dimension)
            .field("model", &"<TextEmbedding>")
            .finish()
    }
}

impl FastEmbedGenerator {
    /// Load the configured model, downloading it on first use.
    ///
    /// # Errors
    /// Returns an error if the model name is unknown or the model fails to
    /// initialize.
    pub fn new(options: &FastEmbedOptions) -> Result<Self, VectorError> {
        let model = parse_embedding_model(&options.model_name)?;

        let has_cached_models = options.cache_dir.exists()
            && options
                .cache_dir
                .read_dir()
                .is_ok_and(|mut entries| entries.any(|_| true));
        if has_cached_models {
            tracing::info!("loading embedding model {} from cache", options.model_name);
        } else {
            tracing::info!(
                "downloading embedding model {} (first time only)",
                options.model_name
            );
        }

        let mut text_model = TextEmbedding::try_new(
            InitOptions::new(model)
                .with_cache_dir(options.cache_dir.clone())
                .with_show_download_progress(options.show_download_progress),
        )
        .map_err(|e| VectorError::EmbeddingFailed(
            format!("Failed to initialize embedding model {}: {e}. Ensure you have internet connection for first-time model download", options.model_name)
        ))?;

        // Measure the dimension instead of hard-coding it per model.
        let sample = text_model
            .embed(vec!["dimension check"], None)
            .map_err(|e| VectorError::EmbeddingFailed(e.to_string()))?;
        let measured = sample.first().map(Vec::len).unwrap_or_default();
        let dimension = VectorDimension::new(measured)?;

        Ok(Self {
            model: Mutex::new(text_model),
            model_name: options.model_name.clone(),
            dimension,
            batch_size: options.batch_size,
        })
    }
}

impl EmbeddingGenerator for FastEmbedGenerator {
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, VectorError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let text_strings: Vec<String> = texts.iter().map(|&s| s.to_string()).collect();

        self.model
            .lock()
            .map_err(|_| {
                VectorError::EmbeddingFailed(
                    "Failed to acquire embedding model lock - model may be poisoned".to_string(),
                )
            })?
            .embed(text_strings, self.batch_size)
            .map_err(|e| VectorError::EmbeddingFailed(format!("Failed to generate embeddings: {e}")))
    }

    fn dimension(&self) -> VectorDimension {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

/// Parse a configured model identifier into a fastembed model.
pub fn parse_embedding_model(name: &str) -> Result<EmbeddingModel, VectorError> {
    let model = match name {
        "AllMiniLML6V2" => EmbeddingModel::AllMiniLML6V2,
        "AllMiniLML12V2" => EmbeddingModel::AllMiniLML12V2,
        "BGESmallENV15" => EmbeddingModel::BGESmallENV15,
        "BGEBaseENV15" => EmbeddingModel::BGEBaseENV15,
        "BGELargeENV15" => EmbeddingModel::BGELargeENV15,
        "MultilingualE5Small" => EmbeddingModel::MultilingualE5Small,
        "MultilingualE5Base" => EmbeddingModel::MultilingualE5Base,
        "MultilingualE5Large" => EmbeddingModel::MultilingualE5Large,
        "ParaphraseMLMiniLML12V2" => EmbeddingModel::ParaphraseMLMiniLML12V2,
        "NomicEmbedTextV15" => EmbeddingModel::NomicEmbedTextV15,
        other => {
            return Err(VectorError::EmbeddingFailed(format!(
                "Unknown embedding model '{other}'. Supported: {}",
                SUPPORTED_MODELS.join(", ")
            )));
        }
    };
    Ok(model)
}

/// Model identifiers accepted by [`parse_embedding_model`].
pub const SUPPORTED_MODELS: &[&str] = &[
    "AllMiniLML6V2",
    "AllMiniLML12V2",
    "BGESmallENV15",
    "BGEBaseENV15",
    "BGELargeENV15",
    "MultilingualE5Small",
    "MultilingualE5Base",
    "MultilingualE5Large",
    "ParaphraseMLMiniLML12V2",
    "NomicEmbedTextV15",
];

/// Mock embedding generator for testing.
///
/// Texts registered with [`MockEmbeddingGenerator::with_fixed`] map to the
/// given vector; all other texts get a deterministic byte-histogram vector.
#[cfg(test)]
pub struct MockEmbeddingGenerator {
    dimension: VectorDimension,
    fixed: std::collections::HashMap<String, Vec<f32>>,
    drop_last: bool,
}

#[cfg(test)]
impl MockEmbeddingGenerator {
    #[must_use]
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: VectorDimension::new(dimension).expect("mock dimension must be non-zero"),
            fixed: std::collections::HashMap::new(),
            drop_last: false,
        }
    }

    /// Pin the embedding returned for `text`.
    #[must_use]
    pub fn with_fixed(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.fixed.insert(text.to_string(), vector);
        self
    }

    /// Make every batch come back one vector short.
    #[must_use]
    pub fn dropping_last(mut self) -> Self {
        self.drop_last = true;
        self
    }

    fn histogram(&self, text: &str) -> Vec<f32> {
        let dim = self.dimension.get();
        let mut embedding = vec![0.0; dim];
        for byte in text.bytes() {
            embedding[byte as usize % dim] += 1.0;
        }
        let magnitude: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for value in &mut embedding {
                *value /= magnitude;
            }
        }
        embedding
    }
}

#[cfg(test)]
impl EmbeddingGenerator for MockEmbeddingGenerator {
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, VectorError> {
        let mut embeddings: Vec<Vec<f32>> = texts
            .iter()
            .map(|text| {
                self.fixed
                    .get(*text)
                    .cloned()
                    .unwrap_or_else(|| self.histogram(text))
            })
            .collect();
        if self.drop_last {
            embeddings.pop();
        }
        Ok(embeddings)
    }

    fn dimension(&self) -> VectorDimension {
        self.dimension
    }

    fn model_name(&self) -> &str {
        "mock-histogram"
    }
}
