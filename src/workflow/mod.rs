//! Task model construction and precedence.
//!
//! Turns priced records into [`Task`](crate::models::Task)s grouped by the
//! physical room they are carried out in, and decides which tasks may be
//! admitted given what is still unfinished.
//!
//! # Ordering
//!
//! Within a room: workflow phase, then dry time descending (drying-first),
//! then explicit workflow order, then input order.
//!
//! # Gate
//!
//! Door/window sanding must finish before the surrounding room is coated,
//! and must itself wait for the room's spackle work.

mod builder;
mod gate;

pub use builder::{compare_in_room, RoomTasks, TaskModel};
pub use gate::{blocking_task, is_eligible};
