use crate::error::ResolutionError;
use crate::provider::IconProvider;
use crate::representation::RawIcon;
use crate::request::IconSource;

/// Obtains the raw icon for a source from the host.  Only the given source
/// is tried; see [`resolve_first`] for falling back to other sources.
pub fn resolve<P>(provider: &P, source: &IconSource) -> Result<RawIcon, ResolutionError>
    where P: IconProvider + ?Sized
{
    let raw = match source {
        IconSource::ExplicitImagePath(path) => {
            provider.resolve_by_path(path).map_err(|err| {
                log::debug!("loading {} failed: {}", path.display(), err);
                ResolutionError::LoadFailed(path.clone())
            })?
        }
        IconSource::FileTypeClass(file_type) => provider
            .resolve_by_type(file_type)
            .ok_or_else(|| ResolutionError::NoIconForType(file_type.clone()))?,
        IconSource::FilePath(path) => provider
            .resolve_by_file(path)
            .ok_or_else(|| ResolutionError::NoIconForPath(path.clone()))?,
    };
    log::debug!("resolved {} to {} representation(s)", source, raw.len());
    Ok(raw)
}

/// Resolves `source`, then each of `fallbacks` in order, stopping at the
/// first success.  If every source fails, returns the last failure.
pub fn resolve_first<P>(provider: &P,
                        source: &IconSource,
                        fallbacks: &[IconSource])
                        -> Result<RawIcon, ResolutionError>
    where P: IconProvider + ?Sized
{
    let mut result = resolve(provider, source);
    for fallback in fallbacks {
        let err = match result {
            Ok(raw) => return Ok(raw),
            Err(err) => err,
        };
        log::debug!("{}; falling back to {}", err, fallback);
        result = resolve(provider, fallback);
    }
    result
}
