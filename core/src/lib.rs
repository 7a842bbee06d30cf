//! # Tanner Core
//!
//! Graph state engine for an interactive editor of bipartite (Tanner)
//! graphs: check nodes and var nodes placed on a grid, connected only
//! across kinds.
//!
//! ## Example
//!
//! ```rust
//! use tanner_core::{EditorState, Intent, Key, NodeId};
//!
//! let mut editor = EditorState::new();
//! editor.apply(Intent::Click { x: 0, y: 0 }).unwrap(); // check node
//! editor.apply(Intent::Click { x: 1, y: 0 }).unwrap(); // var node, connected
//! assert!(editor.graph().is_connected(NodeId::check(0), NodeId::var(0)));
//!
//! editor.apply(Intent::Key(Key::Undo)).unwrap();
//! assert_eq!(editor.graph().len(), 1);
//! ```

pub mod config;
pub mod connection;
pub mod coords;
pub mod error;
pub mod ffi;
pub mod history;
pub mod interaction;
pub mod node;
pub mod registry;
pub mod scene;
pub mod shared;
pub mod snapshot;

pub use config::EditorConfig;
pub use coords::{GridPos, Scale};
pub use error::{GraphError, Result};
pub use history::History;
pub use interaction::{EditorState, Intent, Key, NoOp, Outcome};
pub use node::{Node, NodeId, NodeKind};
pub use registry::Graph;
pub use scene::Scene;
pub use shared::SharedEditor;
pub use snapshot::{GraphRecord, NodeRecord};
