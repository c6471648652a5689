//! domlet — a thin object surface over a document tree.
//!
//! Callers get a [`NodeHandle`] for one node from a [`Page`] (by selector
//! query or by creation) and mutate the node through it: position, style,
//! attributes, content, visibility, child composition, event binding. The
//! tree itself lives in the platform crates; a handle caches nothing.
//!
//! There is deliberately no method chaining — every mutating operation is a
//! terminal statement returning `()`.
//!
//! ```
//! use domlet::{CreateOptions, Offset, Page};
//!
//! let page = Page::from_markup(r#"<div id="stage"></div>"#);
//! let stage = page.select("#stage")?;
//!
//! let badge = page.create(CreateOptions::tag("span").with_id("badge"));
//! badge.text("hi");
//! badge.append_to(&stage);
//! badge.position(Offset::xy(12.0, 8.0));
//!
//! assert_eq!(badge.pure_position().x, 12.0);
//! # Ok::<(), domlet::SelectError>(())
//! ```
//!
//! ## Crates
//!
//! - [`dom`] - document tree, attributes, inline style, events
//! - [`selector`] - selector parsing and first-match querying
//! - [`markup`] - fragment parsing for raw-content replacement

#![forbid(unsafe_code)]

pub mod error;
pub mod handle;
pub mod page;
pub mod position;

pub use error::SelectError;
pub use handle::NodeHandle;
pub use page::{CreateOptions, Page, Target};
pub use position::{px_number, px_string, Offset, PurePosition};

// The platform types a caller meets through the handle surface.
pub use dom::{
    dispatch, Event, EventCategory, EventKind, KeyData, Modifiers, NodeId, PointerData,
    SharedDocument,
};
