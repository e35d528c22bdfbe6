use std::any::Any;
use std::collections::{BTreeMap, HashMap, HashSet};

use orrery_common::{Point, Tint, Viewport};
use tracing::debug;

use super::traits::{RenderBackend, SpriteExtensions};
use super::types::{AssetFailure, BackendError, ContainerHandle, SpriteHandle, SpriteState};

const DEFAULT_ASSET_SIZE: (f64, f64) = (256.0, 256.0);

struct HeadlessSprite {
    state: SpriteState,
    url: String,
    container: ContainerHandle,
    tint: Option<Tint>,
}

/// In-memory backend: keeps sprite state, draws nothing.
///
/// Used by the CLI runner and by tests. Asset sizes default to 256×256;
/// individual assets can be given a size or marked as failing to load.
pub struct HeadlessBackend {
    viewport: Viewport,
    next_id: u64,
    containers: HashMap<ContainerHandle, Vec<SpriteHandle>>,
    sprites: BTreeMap<SpriteHandle, HeadlessSprite>,
    loaded: HashSet<String>,
    failing: HashSet<String>,
    sizes: HashMap<String, (f64, f64)>,
    load_calls: Vec<Vec<String>>,
    extensions_enabled: bool,
}

impl HeadlessBackend {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            next_id: 1,
            containers: HashMap::new(),
            sprites: BTreeMap::new(),
            loaded: HashSet::new(),
            failing: HashSet::new(),
            sizes: HashMap::new(),
            load_calls: Vec::new(),
            extensions_enabled: true,
        }
    }

    /// Natural size reported for sprites created from `url`.
    pub fn with_asset_size(mut self, url: &str, width: f64, height: f64) -> Self {
        self.sizes.insert(url.to_string(), (width, height));
        self
    }

    /// Make loading `url` fail.
    pub fn with_failing_asset(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    /// Report no [`SpriteExtensions`] support.
    pub fn without_extensions(mut self) -> Self {
        self.extensions_enabled = false;
        self
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn sprite_count(&self) -> usize {
        self.sprites.len()
    }

    pub fn container_count(&self) -> usize {
        self.containers.len()
    }

    /// Every sprite handle currently alive, in creation order.
    pub fn sprite_handles(&self) -> Vec<SpriteHandle> {
        self.sprites.keys().copied().collect()
    }

    pub fn url_of(&self, sprite: SpriteHandle) -> Option<&str> {
        self.sprites.get(&sprite).map(|s| s.url.as_str())
    }

    pub fn tint_of(&self, sprite: SpriteHandle) -> Option<Tint> {
        self.sprites.get(&sprite).and_then(|s| s.tint)
    }

    /// The url lists passed to each `load_assets` call.
    pub fn load_calls(&self) -> &[Vec<String>] {
        &self.load_calls
    }

    fn next_handle(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl RenderBackend for HeadlessBackend {
    fn create_container(&mut self) -> Result<ContainerHandle, BackendError> {
        let handle = ContainerHandle(self.next_handle());
        self.containers.insert(handle, Vec::new());
        Ok(handle)
    }

    fn create_sprite(
        &mut self,
        container: ContainerHandle,
        url: &str,
    ) -> Result<SpriteHandle, BackendError> {
        if !self.containers.contains_key(&container) {
            return Err(BackendError::UnknownContainer(container));
        }
        if !self.loaded.contains(url) {
            return Err(BackendError::AssetNotLoaded(url.to_string()));
        }
        let (w, h) = self.sizes.get(url).copied().unwrap_or(DEFAULT_ASSET_SIZE);
        let handle = SpriteHandle(self.next_handle());
        self.sprites.insert(
            handle,
            HeadlessSprite {
                state: SpriteState::new(w, h),
                url: url.to_string(),
                container,
                tint: None,
            },
        );
        if let Some(children) = self.containers.get_mut(&container) {
            children.push(handle);
        }
        Ok(handle)
    }

    fn load_assets(&mut self, urls: &[String]) -> Vec<AssetFailure> {
        self.load_calls.push(urls.to_vec());
        let mut failures = Vec::new();
        for url in urls {
            if self.failing.contains(url) {
                failures.push(AssetFailure {
                    url: url.clone(),
                    reason: "headless: marked as failing".into(),
                });
            } else {
                self.loaded.insert(url.clone());
            }
        }
        debug!(
            loaded = urls.len() - failures.len(),
            failed = failures.len(),
            "headless assets loaded"
        );
        failures
    }

    fn sprite(&self, handle: SpriteHandle) -> Option<&SpriteState> {
        self.sprites.get(&handle).map(|s| &s.state)
    }

    fn sprite_mut(&mut self, handle: SpriteHandle) -> Option<&mut SpriteState> {
        self.sprites.get_mut(&handle).map(|s| &mut s.state)
    }

    fn destroy_sprite(&mut self, handle: SpriteHandle) -> bool {
        match self.sprites.remove(&handle) {
            Some(sprite) => {
                if let Some(children) = self.containers.get_mut(&sprite.container) {
                    children.retain(|h| *h != handle);
                }
                true
            }
            None => false,
        }
    }

    fn destroy_container(&mut self, handle: ContainerHandle) -> bool {
        match self.containers.remove(&handle) {
            Some(children) => {
                for child in children {
                    self.sprites.remove(&child);
                }
                true
            }
            None => false,
        }
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn extensions(&mut self) -> Option<&mut dyn SpriteExtensions> {
        if self.extensions_enabled {
            Some(self as &mut dyn SpriteExtensions)
        } else {
            None
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl SpriteExtensions for HeadlessBackend {
    fn set_anchor(&mut self, sprite: SpriteHandle, anchor: Point) -> bool {
        match self.sprites.get_mut(&sprite) {
            Some(s) => {
                s.state.anchor = anchor;
                true
            }
            None => false,
        }
    }

    fn set_tint(&mut self, sprite: SpriteHandle, tint: Tint) -> bool {
        match self.sprites.get_mut(&sprite) {
            Some(s) => {
                s.tint = Some(tint);
                true
            }
            None => false,
        }
    }
}
