//! Texture preload
//!
//! One join over every texture the effect needs: the brush plus one per page
//! image. Loads run in parallel and independently; every failure is reported,
//! and any failure keeps the driver out of `Running`.

use crate::error::{RippleError, RippleResult};
use rayon::prelude::*;

/// Where textures come from. Implementations decode to CPU-side pixels; GPU
/// upload happens afterwards on the render thread.
pub trait TextureSource: Sync {
    type Texture: Send;

    fn load(&self, url: &str) -> RippleResult<Self::Texture>;
}

/// Everything the pipeline needs before it can start
#[derive(Debug)]
pub struct Preloaded<T> {
    pub brush: T,
    /// One per image url, in request order
    pub images: Vec<T>,
}

/// Load the brush and all images. Each failure goes to `on_failure`; the first
/// one is returned.
pub fn preload<S: TextureSource>(
    source: &S,
    brush_url: &str,
    image_urls: &[String],
    on_failure: &mut dyn FnMut(&RippleError),
) -> RippleResult<Preloaded<S::Texture>> {
    let urls: Vec<&str> = std::iter::once(brush_url)
        .chain(image_urls.iter().map(String::as_str))
        .collect();

    let results: Vec<RippleResult<S::Texture>> =
        urls.par_iter().map(|url| source.load(url)).collect();

    let mut textures = Vec::with_capacity(results.len());
    let mut first_error = None;
    for result in results {
        match result {
            Ok(texture) => textures.push(texture),
            Err(e) => {
                tracing::error!("{}", e);
                on_failure(&e);
                first_error.get_or_insert(e);
            }
        }
    }

    if let Some(e) = first_error {
        return Err(e);
    }

    let mut textures = textures.into_iter();
    let brush = textures.next().ok_or_else(|| RippleError::AssetLoad {
        url: brush_url.to_string(),
        reason: "no texture produced".into(),
    })?;

    tracing::info!("Preloaded brush and {} images", image_urls.len());
    Ok(Preloaded {
        brush,
        images: textures.collect(),
    })
}
