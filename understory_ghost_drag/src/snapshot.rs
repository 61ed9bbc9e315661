// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Size;

/// Captured visual content of the dragged element.
///
/// `I` is whatever image handle the host renders with. A snapshot is
/// immutable once created; a new drag cycle takes a new snapshot.
#[derive(Clone, Debug)]
pub struct Snapshot<I> {
    image: I,
    size: Size,
}

impl<I> Snapshot<I> {
    /// Wraps a captured image of `size`.
    ///
    /// Negative or NaN dimensions are stored as zero, which the rest of the
    /// crate treats as degenerate geometry.
    #[must_use]
    pub fn new(image: I, size: Size) -> Self {
        Self {
            image,
            size: Size::new(size.width.max(0.0), size.height.max(0.0)),
        }
    }

    /// The host image handle.
    #[must_use]
    pub fn image(&self) -> &I {
        &self.image
    }

    /// Unrotated size of the image.
    #[must_use]
    pub fn size(&self) -> Size {
        self.size
    }

    /// The larger of width and height.
    #[must_use]
    pub fn max_dimension(&self) -> f64 {
        self.size.max_side()
    }

    /// Consumes the snapshot, returning the image handle.
    pub fn into_image(self) -> I {
        self.image
    }
}
