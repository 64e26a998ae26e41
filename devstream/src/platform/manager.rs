//! CLI mode navigation.

use indexmap::IndexMap;
use log::{debug, info};

use super::layer::Layer;
use super::mode::ModeDetector;
use crate::error::{LayerError, Result};
use crate::session::{DeviceStream, SendOptions};
use crate::transport::Transport;

/// Manages CLI mode navigation over an ordered stack of layers.
///
/// Layers are kept in insertion order, lowest mode first. Switching walks
/// the stack one layer at a time and re-checks the real mode after every
/// step.
pub struct LayerManager {
    /// All registered layers, lowest first.
    layers: IndexMap<String, Layer>,

    /// Prompt to mode-name mapping.
    detector: Box<dyn ModeDetector>,

    /// Last known mode, detected lazily.
    current: Option<String>,
}

impl LayerManager {
    /// Create an empty manager.
    pub fn new(detector: impl ModeDetector + 'static) -> Self {
        Self {
            layers: IndexMap::new(),
            detector: Box::new(detector),
            current: None,
        }
    }

    /// Register the next layer up the stack.
    pub fn with_layer(mut self, layer: Layer) -> Self {
        self.add_layer(layer);
        self
    }

    /// Register the next layer up the stack.
    pub fn add_layer(&mut self, layer: Layer) -> &mut Self {
        self.layers.insert(layer.name().to_string(), layer);
        self
    }

    /// Get a layer by name.
    pub fn get(&self, name: &str) -> Option<&Layer> {
        self.layers.get(name)
    }

    /// All mode names, lowest first.
    pub fn mode_names(&self) -> impl Iterator<Item = &str> {
        self.layers.keys().map(String::as_str)
    }

    /// The cached mode, if known.
    pub fn cached_mode(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Forget the cached mode so the next query re-detects it.
    pub fn reset(&mut self) {
        self.current = None;
    }

    /// Ask the device for a fresh prompt and classify it.
    pub async fn check_mode<T: Transport>(&mut self, stream: &mut DeviceStream<T>) -> Result<String> {
        info!("{}: Recognizing the current cli mode", stream.host());
        let prompt = stream
            .send_commands("\n", &SendOptions::new().with_strip_prompt(false))
            .await?;

        let mode = self.detector.detect(&prompt)?;
        if !self.layers.contains_key(&mode) {
            return Err(LayerError::UnknownMode { name: mode }.into());
        }

        info!("{}: Recognized cli mode is {}", stream.host(), mode);
        Ok(mode)
    }

    /// The current mode, detected on first use.
    pub async fn current_mode<T: Transport>(
        &mut self,
        stream: &mut DeviceStream<T>,
    ) -> Result<String> {
        let mode = match self.current.take() {
            Some(mode) => mode,
            None => self.check_mode(stream).await?,
        };
        debug!("{}: Current cli mode is {}", stream.host(), mode);
        self.current = Some(mode.clone());
        Ok(mode)
    }

    /// Move the device to `target`, returning the raw transition output.
    pub async fn switch_to<T: Transport>(
        &mut self,
        stream: &mut DeviceStream<T>,
        target: &str,
    ) -> Result<String> {
        let target_index = self.index_of(target)?;
        let current = self.current_mode(stream).await?;
        let mut index = self.index_of(&current)?;

        if index == target_index {
            info!("{}: Already in {} cli mode", stream.host(), target);
            return Ok(String::new());
        }

        info!(
            "{}: Switching from {} to {} cli mode",
            stream.host(),
            current,
            target
        );

        // Unknown until the walk completes.
        self.current = None;

        let mut output = String::new();
        while index != target_index {
            let next = if index < target_index {
                let next = index + 1;
                output.push_str(&self.layer_at(next)?.enter(stream).await?);
                next
            } else {
                output.push_str(&self.layer_at(index)?.exit(stream).await?);
                index - 1
            };

            let expected = self.layer_at(next)?.name().to_string();
            let real = self.check_mode(stream).await?;
            if real != expected {
                return Err(LayerError::SwitchFailed {
                    host: stream.host().to_string(),
                    target: expected,
                }
                .into());
            }
            index = next;
        }

        self.current = Some(target.to_string());
        Ok(output)
    }

    fn index_of(&self, name: &str) -> Result<usize> {
        self.layers.get_index_of(name).ok_or_else(|| {
            LayerError::UnknownMode {
                name: name.to_string(),
            }
            .into()
        })
    }

    fn layer_at(&self, index: usize) -> Result<&Layer> {
        self.layers
            .get_index(index)
            .map(|(_, layer)| layer)
            .ok_or_else(|| {
                LayerError::UnknownMode {
                    name: format!("#{index}"),
                }
                .into()
            })
    }
}

impl std::fmt::Debug for LayerManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayerManager")
            .field("layers", &self.layers)
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}
