//! thin - tiny DOM utility
//!
//! Element selection, direct and delegated event binding, iteration, and a
//! document-ready signal over an in-memory DOM host.
//!
//! ```
//! use thin::Page;
//!
//! let page = Page::from_html(r#"<button class="go">Go</button>"#);
//! let hits = std::rc::Rc::new(std::cell::RefCell::new(0));
//!
//! let counter = hits.clone();
//! page.select(".go").bind("click", move |_el, _ev| {
//!     *counter.borrow_mut() += 1;
//! });
//!
//! let button = page.select(".go").get(0).unwrap();
//! page.dispatch("click", button);
//! assert_eq!(*hits.borrow(), 1);
//! ```

mod handle;
mod page;
mod ready;

pub use handle::{ElementSet, Selection};
pub use page::{Page, WeakPage};
pub use ready::{start_ready_probe, ManualScheduler, ReadyCallback, ReadyQueue, TaskScheduler};

pub use thin_dom::{Document, DomTree, NodeId, ReadyState};
pub use thin_events::{BackendKind, Event};
