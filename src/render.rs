use crate::config::RenderConfig;
use crate::encode::{encode, EncodedBlob};
use crate::error::IconError;
use crate::name::{name, placeholder, IconName};
use crate::normalize::normalize;
use crate::provider::{IconProvider, SystemIcons};
use crate::request::IconRequest;
use crate::resolve::resolve_first;
use crate::select::select;

/// The result of rendering one icon request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RenderedIcon {
    name: IconName,
    bytes: Vec<u8>,
}

impl RenderedIcon {
    fn from_blob(blob: EncodedBlob) -> RenderedIcon {
        let name = name(blob.bytes(), blob.format());
        RenderedIcon { name, bytes: blob.into_bytes() }
    }

    fn placeholder(request: &IconRequest) -> RenderedIcon {
        RenderedIcon {
            name: placeholder(&request.display_name, &request.extension()),
            bytes: Vec::new(),
        }
    }

    /// Returns the icon's file name.
    pub fn name(&self) -> &IconName {
        &self.name
    }

    /// Returns the encoded icon.  Empty for a placeholder.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns true if the render failed and this is a placeholder.
    pub fn is_placeholder(&self) -> bool {
        self.name.is_placeholder()
    }

    /// Consumes the icon, returning its name and bytes.
    pub fn into_parts(self) -> (IconName, Vec<u8>) {
        (self.name, self.bytes)
    }
}

/// Runs icon requests through the pipeline: resolve, select, normalize,
/// encode, name.
///
/// Each render is independent; a renderer holds no per-request state and
/// may be shared between threads if its provider can.
#[derive(Clone, Debug)]
pub struct IconRenderer<P> {
    provider: P,
    config: RenderConfig,
}

impl IconRenderer<SystemIcons> {
    /// Creates a renderer backed by the host's icons.
    pub fn system() -> IconRenderer<SystemIcons> {
        IconRenderer::new(SystemIcons::default())
    }
}

impl<P: IconProvider> IconRenderer<P> {
    /// Creates a renderer with the default configuration.
    pub fn new(provider: P) -> IconRenderer<P> {
        IconRenderer::with_config(provider, RenderConfig::default())
    }

    /// Creates a renderer with the given configuration.
    pub fn with_config(provider: P, config: RenderConfig) -> IconRenderer<P> {
        IconRenderer { provider, config }
    }

    /// Returns the icon provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Returns the configuration.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Renders one request.
    ///
    /// In strict mode the first failing stage's error is returned.
    /// Otherwise the failure is logged and a placeholder is returned: the
    /// request's display name with the request's extension, and no bytes.
    pub fn render(&self, request: &IconRequest) -> Result<RenderedIcon, IconError> {
        match self.try_render(request) {
            Ok(icon) => {
                log::info!("rendered icon {} for {}", icon.name(), request.display_name);
                Ok(icon)
            }
            Err(err) if request.strict_mode => Err(err),
            Err(err) => {
                log::warn!("unable to render icon for {} ({}): {}",
                           request.display_name,
                           request.source,
                           err);
                Ok(RenderedIcon::placeholder(request))
            }
        }
    }

    fn try_render(&self, request: &IconRequest) -> Result<RenderedIcon, IconError> {
        let raw = resolve_first(&self.provider, &request.source,
                                &request.fallback_sources)?;
        let rep = select(raw, request.target_size)?;
        let canvas = normalize(&rep, request.target_size, &self.config)?;
        let blob = encode(&canvas, &request.output_format)?;
        Ok(RenderedIcon::from_blob(blob))
    }
}
