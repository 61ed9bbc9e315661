// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Ghost Drag: throw away a UI element by dragging its snapshot.
//!
//! When the user drags an element, the host captures it as an image (a
//! [`Snapshot`]) and hides the original. The snapshot follows the pointer,
//! rotating as it is pulled around its centre. On release it either
//!
//! - **flings**: a fast release (above the velocity threshold on either axis)
//!   continues with decaying inertia, or
//! - **flees**: a slow release sends it spinning towards the nearest viewport
//!   edge along a slightly randomized path.
//!
//! Once its bounds leave the viewport the snapshot is removed
//! ([`DragPhase::OutOfScreen`]). If it comes to rest on screen it fades out
//! instead ([`DragPhase::Gone`]). Either way the machine returns to
//! [`DragPhase::Idle`]; the original element stays hidden until the host calls
//! [`GhostDragMachine::reset`].
//!
//! ## Driving the machine
//!
//! [`GhostDragMachine`] reads no clock and draws nothing. The host
//!
//! 1) supplies a snapshot with [`GhostDragMachine::provide_snapshot`],
//! 2) forwards pointer events as [`PointerSample`]s with millisecond timestamps,
//! 3) calls [`GhostDragMachine::tick`] every frame while it returns `true`,
//! 4) draws the snapshot with [`GhostDragMachine::transform`] and reacts to
//!    the queued [`GhostDragEvent`]s, either by draining them or through a
//!    [`GhostDragObserver`].
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use rand::rngs::mock::StepRng;
//! use understory_ghost_drag::pointer::PointerSample;
//! use understory_ghost_drag::{
//!     DragPhase, ExitOrientation, GhostDragEvent, GhostDragMachine, Snapshot,
//! };
//!
//! // A fixed random source keeps the flee path reproducible.
//! let mut machine = GhostDragMachine::with_rng(Size::new(1000.0, 2000.0), StepRng::new(0, 0));
//! machine.provide_snapshot(Snapshot::new("card", Size::new(100.0, 200.0)));
//!
//! // Press just above the card's centre and pull down onto it.
//! let local = Point::new(50.0, 90.0);
//! machine.on_pointer_down(PointerSample::new(local, Point::new(500.0, 990.0), 0));
//! let local = Point::new(50.0, 100.0);
//! machine.on_pointer_move(PointerSample::new(local, Point::new(500.0, 1000.0), 16));
//! assert_eq!(machine.phase(), DragPhase::Dragging);
//!
//! // A slow release flees; from the exact centre every edge ties and left wins.
//! machine.on_pointer_up(200);
//! assert_eq!(machine.phase(), DragPhase::Fleeing);
//! assert_eq!(machine.target_orientation(), Some(ExitOrientation::Left));
//!
//! let mut now = 200;
//! while machine.tick(now) {
//!     now += 16;
//! }
//! assert_eq!(machine.phase(), DragPhase::Idle);
//! assert!(machine.drain_events().any(|e| e == GhostDragEvent::RemovalRequested));
//! assert!(machine.reset());
//! ```
//!
//! The geometry used along the way ([`geometry::clockwise_angle`],
//! [`geometry::select_exit_trajectory`], [`geometry::rotated_bounds`],
//! [`geometry::is_fully_offscreen`]) is public for hosts that need it directly.
//! Motion primitives come from `understory_fling`.

pub mod config;
pub mod events;
pub mod geometry;
pub mod pointer;

mod machine;
mod session;
mod snapshot;

pub use config::{ConfigError, GhostDragConfig};
pub use events::{DragPhase, GhostDragEvent, GhostDragObserver};
pub use geometry::{ExitOrientation, ExitTrajectory, GhostTransform};
pub use machine::GhostDragMachine;
pub use pointer::PointerSample;
pub use session::DragSession;
pub use snapshot::Snapshot;
