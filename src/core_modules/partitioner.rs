// THEORY:
// The `partitioner` is the concurrency core of the encoder. It turns a pixel source
// into a list of `PixelRecord`s by recursive, fork-join quadrant splitting.
//
// Key architectural principles:
// 1.  **Fork-Join**: A region larger than the leaf size is split into quadrants and
//     each non-empty quadrant is spawned as its own tokio task. The parent waits
//     only on its own children, then concatenates their results in the fixed order
//     top-left, top-right, bottom-left, bottom-right.
// 2.  **Shared, Read-Only Source**: All tasks hold an `Arc` to the same source and
//     read disjoint rectangles of it. Nothing is written to the source, so no lock
//     is needed.
// 3.  **Owned Results**: Each task builds its own `Vec` and moves it to the parent.
//     There is no shared writer and no shared counter. The tree is race-free by
//     construction.
// 4.  **Row-Major Output**: Quadrant order is an artifact of the split strategy. The
//     top-level `encode_image` re-sorts by (y, x) so the framer, and any decoder,
//     never needs to know how the work was divided.
// 5.  **Fail the Whole Tree**: A leaf that cannot read a pixel returns an error that
//     travels up through every join. There is no partial result.

use crate::core_modules::pixel::pixel::PixelSource;
use crate::core_modules::pixel_record::PixelRecord;
use crate::core_modules::region::region::Region;
use crate::error::{CodecError, Result};
use futures::future::{BoxFuture, FutureExt, try_join_all};
use log::{debug, trace};
use std::sync::Arc;

/// Serializes every pixel of `region` on the current thread, row-major.
pub fn encode_region_sequential<S>(source: &S, region: Region) -> Result<Vec<PixelRecord>>
where
    S: PixelSource + ?Sized,
{
    let mut records = Vec::with_capacity(region.area() as usize);
    for (x, y) in region.coordinates() {
        records.push(PixelRecord::new(x, y, source.get_pixel(x, y)?));
    }
    Ok(records)
}

/// Serializes every pixel of `region`, splitting into parallel quadrant tasks until a
/// region fits within `leaf_edge` on both axes. Records come back in quadrant order.
///
/// Must be polled inside a tokio runtime.
pub fn encode_region<S>(
    source: Arc<S>,
    region: Region,
    leaf_edge: u32,
) -> BoxFuture<'static, Result<Vec<PixelRecord>>>
where
    S: PixelSource + 'static,
{
    async move {
        if region.is_empty() {
            return Ok(Vec::new());
        }

        let leaf_edge = leaf_edge.max(1);
        if region.fits_within(leaf_edge) {
            trace!("leaf {:?}", region);
            return encode_region_sequential(source.as_ref(), region);
        }

        trace!("splitting {:?}", region);
        let children: Vec<_> = region
            .split()
            .into_iter()
            .map(|quadrant| tokio::spawn(encode_region(Arc::clone(&source), quadrant, leaf_edge)))
            .collect();

        let joined = try_join_all(children)
            .await
            .map_err(|e| CodecError::TaskFailed(e.to_string()))?;

        let mut records = Vec::with_capacity(region.area() as usize);
        for quadrant_records in joined {
            records.extend(quadrant_records?);
        }
        Ok(records)
    }
    .boxed()
}

/// Sorts records into row-major (y, x) order.
pub fn linearize(records: &mut [PixelRecord]) {
    records.sort_unstable_by_key(PixelRecord::position);
}

/// Encodes a whole source in parallel and returns its records in row-major order.
pub async fn encode_image<S>(source: Arc<S>, leaf_edge: u32) -> Result<Vec<PixelRecord>>
where
    S: PixelSource + 'static,
{
    let region = Region::full(source.width(), source.height());
    debug!(
        "encoding {}x{} region with leaf edge {}",
        region.width(),
        region.height(),
        leaf_edge
    );
    let mut records = encode_region(source, region, leaf_edge).await?;
    linearize(&mut records);
    debug_assert_eq!(records.len() as u64, region.area());
    Ok(records)
}
