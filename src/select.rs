use crate::error::SelectionError;
use crate::representation::{RawIcon, Representation};

/// Picks the representation to redraw at `target_size` and discards the
/// rest of the raw icon.
///
/// A representation exactly `target_size` wide is taken as soon as it is
/// seen.  Otherwise the narrowest representation wider than the target is
/// preferred, so that artwork is scaled down rather than up, and the widest
/// narrower one is the fallback.  Widths are nominal (see
/// [`Representation::width`]).
pub fn select(raw: RawIcon, target_size: f64) -> Result<Representation, SelectionError> {
    let mut best: Option<Representation> = None;
    for rep in raw.into_representations() {
        let width = rep.width();
        if width == target_size {
            best = Some(rep);
            break;
        }
        let replace = match &best {
            None => true,
            Some(current) => {
                let current_width = current.width();
                if width > target_size {
                    current_width < target_size || width < current_width
                } else {
                    current_width < target_size && width > current_width
                }
            }
        };
        if replace {
            best = Some(rep);
        }
    }
    let best = best.ok_or(SelectionError::NoUsableRepresentation)?;
    log::debug!("selected {}x{} representation (density {}) for size {}",
                best.pixel_width(),
                best.pixel_height(),
                best.density(),
                target_size);
    Ok(best)
}
