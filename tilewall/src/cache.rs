// Copyright 2026 the Tilewall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Memoized image loads keyed by [`ImageRef`].
//!
//! Loading is driven by the host: the cache only records what was asked
//! for and what came back. A typical loop:
//!
//! 1. [`ImageCache::request`] queues a key the first time it is seen.
//! 2. The host drains [`ImageCache::take_pending_requests`] and starts a
//!    fetch for each key, without waiting on it.
//! 3. When a fetch completes the host calls [`ImageCache::image_loaded`]
//!    (after creating the image on its backend) or
//!    [`ImageCache::image_failed`].
//!
//! Failed keys stay failed until [`ImageCache::retry_failed`], so a broken
//! image is not refetched every frame.

use std::collections::VecDeque;
use std::fmt;

use hashbrown::HashMap;
use tilewall_render::LoadedImage;

use crate::tile::ImageRef;

/// Load state of one image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ImageState {
    /// Requested; no result yet.
    Pending,
    /// Decoded and created on the backend.
    Loaded(LoadedImage),
    /// The fetch or decode failed.
    Failed,
}

/// Decides which loaded images to drop.
///
/// The cache notifies the policy of every access and asks it for a victim
/// after each successful load.
pub trait EvictionPolicy: fmt::Debug {
    /// `key` was read or stored.
    fn touch(&mut self, key: &ImageRef);

    /// `key` left the cache.
    fn forget(&mut self, key: &ImageRef);

    /// Returns a key to evict while holding `loaded` images, or `None` to
    /// keep everything.
    fn victim(&mut self, loaded: usize) -> Option<ImageRef>;
}

/// Keeps every image forever.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeepAll;

impl EvictionPolicy for KeepAll {
    fn touch(&mut self, _key: &ImageRef) {}

    fn forget(&mut self, _key: &ImageRef) {}

    fn victim(&mut self, _loaded: usize) -> Option<ImageRef> {
        None
    }
}

/// Evicts the least recently used image above a fixed count.
#[derive(Clone, Debug)]
pub struct LeastRecentlyUsed {
    capacity: usize,
    order: VecDeque<ImageRef>,
}

impl LeastRecentlyUsed {
    /// Keeps at most `capacity` loaded images.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            order: VecDeque::new(),
        }
    }
}

impl EvictionPolicy for LeastRecentlyUsed {
    fn touch(&mut self, key: &ImageRef) {
        self.forget(key);
        self.order.push_back(key.clone());
    }

    fn forget(&mut self, key: &ImageRef) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
        }
    }

    fn victim(&mut self, loaded: usize) -> Option<ImageRef> {
        if loaded > self.capacity {
            self.order.front().cloned()
        } else {
            None
        }
    }
}

/// Image cache with insert-if-absent semantics.
#[derive(Debug)]
pub struct ImageCache {
    entries: HashMap<ImageRef, ImageState>,
    queue: Vec<ImageRef>,
    loaded: usize,
    policy: Box<dyn EvictionPolicy>,
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageCache {
    /// Creates a cache that never evicts.
    #[must_use]
    pub fn new() -> Self {
        Self::with_policy(Box::new(KeepAll))
    }

    /// Creates a cache with a custom eviction policy.
    #[must_use]
    pub fn with_policy(policy: Box<dyn EvictionPolicy>) -> Self {
        Self {
            entries: HashMap::new(),
            queue: Vec::new(),
            loaded: 0,
            policy,
        }
    }

    /// Number of known keys in any state.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no key is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of loaded images.
    #[must_use]
    pub fn loaded_count(&self) -> usize {
        self.loaded
    }

    /// Queues `key` for loading unless it is already known.
    ///
    /// Returns `true` if a new request was queued.
    pub fn request(&mut self, key: &ImageRef) -> bool {
        if self.entries.contains_key(key) {
            return false;
        }
        log::debug!("queueing image {key}");
        self.entries.insert(key.clone(), ImageState::Pending);
        self.queue.push(key.clone());
        true
    }

    /// Drains the keys queued since the last call.
    pub fn take_pending_requests(&mut self) -> Vec<ImageRef> {
        std::mem::take(&mut self.queue)
    }

    /// Current state of `key`.
    #[must_use]
    pub fn state(&self, key: &ImageRef) -> Option<ImageState> {
        self.entries.get(key).copied()
    }

    /// The loaded image for `key`, marking it as recently used.
    pub fn get(&mut self, key: &ImageRef) -> Option<LoadedImage> {
        match self.entries.get(key) {
            Some(ImageState::Loaded(image)) => {
                let image = *image;
                self.policy.touch(key);
                Some(image)
            }
            _ => None,
        }
    }

    /// Records a completed load.
    ///
    /// Returns images evicted to make room; the caller destroys them on its
    /// backend. A repeated completion for a loaded key replaces the old
    /// image, which is returned as evicted.
    pub fn image_loaded(&mut self, key: &ImageRef, image: LoadedImage) -> Vec<LoadedImage> {
        let mut evicted = Vec::new();
        match self.entries.insert(key.clone(), ImageState::Loaded(image)) {
            Some(ImageState::Loaded(old)) if old != image => evicted.push(old),
            Some(ImageState::Loaded(_)) => {}
            _ => self.loaded += 1,
        }
        log::debug!("image {key} loaded ({}x{})", image.size.width, image.size.height);
        self.policy.touch(key);

        while let Some(victim) = self.policy.victim(self.loaded) {
            self.policy.forget(&victim);
            if let Some(ImageState::Loaded(old)) = self.entries.remove(&victim) {
                log::debug!("evicting image {victim}");
                self.loaded -= 1;
                evicted.push(old);
            }
        }
        evicted
    }

    /// Records a failed load; the tile keeps its placeholder.
    pub fn image_failed(&mut self, key: &ImageRef) {
        log::warn!("failed to load image {key}");
        if let Some(ImageState::Loaded(_)) = self.entries.insert(key.clone(), ImageState::Failed) {
            self.loaded -= 1;
            self.policy.forget(key);
        }
    }

    /// Forgets every failed key so the next request fetches it again.
    pub fn retry_failed(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, state| *state != ImageState::Failed);
        before - self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Size;
    use tilewall_imaging::ImageId;

    fn image(id: u32) -> LoadedImage {
        LoadedImage {
            id: ImageId(id),
            size: Size::new(10.0, 20.0),
        }
    }

    #[test]
    fn requests_are_queued_once() {
        let mut cache = ImageCache::new();
        let a = ImageRef::from("a.png");
        assert!(cache.request(&a));
        assert!(!cache.request(&a));
        assert_eq!(cache.take_pending_requests(), [a.clone()]);
        assert!(cache.take_pending_requests().is_empty());
        assert_eq!(cache.state(&a), Some(ImageState::Pending));
        assert_eq!(cache.get(&a), None);
    }

    #[test]
    fn loads_and_failures_are_recorded() {
        let mut cache = ImageCache::new();
        let a = ImageRef::from("a.png");
        let b = ImageRef::from("b.png");
        cache.request(&a);
        cache.request(&b);
        assert!(cache.image_loaded(&a, image(1)).is_empty());
        cache.image_failed(&b);

        assert_eq!(cache.get(&a), Some(image(1)));
        assert_eq!(cache.state(&b), Some(ImageState::Failed));
        assert!(!cache.request(&b));
        assert_eq!(cache.loaded_count(), 1);

        assert_eq!(cache.retry_failed(), 1);
        assert!(cache.request(&b));
    }

    #[test]
    fn reloading_returns_the_replaced_image() {
        let mut cache = ImageCache::new();
        let a = ImageRef::from("a.png");
        cache.image_loaded(&a, image(1));
        assert_eq!(cache.image_loaded(&a, image(2)), [image(1)]);
        assert_eq!(cache.loaded_count(), 1);
    }

    #[test]
    fn lru_policy_evicts_oldest() {
        let mut cache = ImageCache::with_policy(Box::new(LeastRecentlyUsed::new(2)));
        let (a, b, c) = (
            ImageRef::from("a"),
            ImageRef::from("b"),
            ImageRef::from("c"),
        );
        cache.image_loaded(&a, image(1));
        cache.image_loaded(&b, image(2));
        // Reading `a` makes `b` the oldest.
        cache.get(&a);
        let evicted = cache.image_loaded(&c, image(3));
        assert_eq!(evicted, [image(2)]);
        assert_eq!(cache.state(&b), None);
        assert_eq!(cache.loaded_count(), 2);
        // An evicted key can be requested again.
        assert!(cache.request(&b));
    }
}
