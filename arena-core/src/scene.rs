//! Independent scene roots and the active-scene switch.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ArenaError, ArenaResult};
use crate::geometry::Size;
use crate::node::{NodeId, SceneNode};
use crate::render::BackgroundRenderer;
use crate::surface::{Color, Layer};
use crate::tree::SceneTree;

/// Name of a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneKey {
    /// Title and start button.
    Intro,
    /// Board, reserves, cards and countdown.
    Main,
    /// Temporary draft scene.
    Draft,
}

impl fmt::Display for SceneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Handles of a scene's root and its pointer proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scene {
    /// Root node carrying the background.
    pub root: NodeId,
    /// Pointer proxy, always the root's last child, drawn on the overlay.
    pub proxy: NodeId,
}

impl Scene {
    /// Build a root of `size` with a `background` fill and its pointer proxy.
    ///
    /// # Errors
    ///
    /// Returns an error if attaching the proxy fails.
    pub fn build<C>(
        tree: &mut SceneTree<C>,
        name: &str,
        size: Size,
        background: Color,
    ) -> ArenaResult<Self> {
        let root = tree.insert(
            SceneNode::new(name)
                .sized(size.width, size.height)
                .with_renderer(BackgroundRenderer::new(background)),
        );
        let proxy = tree.insert(SceneNode::new(format!("{name}/pointer")).on_layer(Layer::Overlay));
        tree.attach(root, proxy)?;
        Ok(Self { root, proxy })
    }

    /// Attach `child` under the root, before the pointer proxy.
    ///
    /// # Errors
    ///
    /// See [`SceneTree::attach_at`].
    pub fn attach<C>(&self, tree: &mut SceneTree<C>, child: NodeId) -> ArenaResult<()> {
        let before_proxy = tree
            .children(self.root)
            .iter()
            .position(|&c| c == self.proxy)
            .unwrap_or(usize::MAX);
        tree.attach_at(self.root, child, before_proxy)
    }
}

/// Named scene roots with exactly one active scene.
///
/// Inactive scenes keep their whole subtree, so switching back restores
/// placements exactly.
#[derive(Debug, Clone, Default)]
pub struct SceneManager {
    scenes: HashMap<SceneKey, Scene>,
    active: Option<SceneKey>,
}

impl SceneManager {
    /// Empty manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a scene, returning the one it replaces.
    pub fn insert(&mut self, key: SceneKey, scene: Scene) -> Option<Scene> {
        self.scenes.insert(key, scene)
    }

    /// Unregister a scene. The active pointer is cleared if it pointed there.
    pub fn remove(&mut self, key: SceneKey) -> Option<Scene> {
        if self.active == Some(key) {
            self.active = None;
        }
        self.scenes.remove(&key)
    }

    /// Look up a scene.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::SceneNotFound`] if `key` is not registered.
    pub fn get(&self, key: SceneKey) -> ArenaResult<Scene> {
        self.scenes
            .get(&key)
            .copied()
            .ok_or_else(|| ArenaError::SceneNotFound(key.to_string()))
    }

    /// Check if a scene is registered.
    #[must_use]
    pub fn contains(&self, key: SceneKey) -> bool {
        self.scenes.contains_key(&key)
    }

    /// Make `key` the active scene and return it.
    ///
    /// The caller fires the activation event into the returned root.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::SceneNotFound`] if `key` is not registered.
    pub fn set_active(&mut self, key: SceneKey) -> ArenaResult<Scene> {
        let scene = self.get(key)?;
        if self.active != Some(key) {
            tracing::debug!(from = ?self.active, to = %key, "switching scene");
        }
        self.active = Some(key);
        Ok(scene)
    }

    /// Key of the active scene.
    #[must_use]
    pub const fn active(&self) -> Option<SceneKey> {
        self.active
    }

    /// The active scene.
    #[must_use]
    pub fn active_scene(&self) -> Option<Scene> {
        self.active.and_then(|key| self.scenes.get(&key).copied())
    }
}
