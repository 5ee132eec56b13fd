//! Vireo Core - DSP Control Plane
//!
//! This crate provides the control plane for the Vireo DSP pipeline:
//! - The capability engine interface (`DspEngine`) both backends implement
//! - The in-process backend over direct native calls (`LocalEngine`)
//! - The out-of-process backend over the numeric parameter protocol
//!   (`RemoteEngine`), with health monitoring and crash recovery
//! - Typed notifications, persisted settings, and configuration replay
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Host                                │
//! │   settings ──▶ NotificationHub ──▶ pump() ──▶ sync passes  │
//! └─────────────────────────────────────────────────────────────┘
//!                 │                              │
//!                 ▼                              ▼
//! ┌──────────────────────────┐   ┌──────────────────────────────┐
//! │       LocalEngine        │   │        RemoteEngine          │
//! │  NativeDsp handle calls  │   │  parameter-protocol writes   │
//! │  (vireo_dsp)             │   │  health check / recovery     │
//! │                          │   │  (vireo_host)                │
//! └──────────────────────────┘   └──────────────────────────────┘
//! ```
//!
//! Both backends report setter failures through [`SetterError`]; events
//! (recovery notices, liveprog script output) travel to the host over a
//! crossbeam channel as [`EngineEvent`]s.

mod engine;
mod error;
mod event;
mod local;
mod notify;
mod registry;
mod remote;
mod settings;
pub mod sync;

pub use engine::DspEngine;
pub use error::{EngineError, EngineResult, SetterError, SetterResult};
pub use event::{ChannelCallbacks, EngineEvent, RebootReason};
pub use local::LocalEngine;
pub use notify::{Notification, NotificationHub, Subscription};
pub use registry::{descriptor, Feature, ParameterDescriptor, PayloadEncoding, REGISTRY};
pub use remote::{HealthStatus, RemoteEngine, SyncPhase};
pub use settings::{DspSettings, Namespace, CUSTOM_CROSSFEED_MODE};

// Re-export boundary types for convenience
pub use vireo_dsp::{DspCallbacks, DummyCallbacks, EelVmVariable, NativeDsp, StubDsp};
pub use vireo_host::{EffectHost, RemoteEffect, StubHost};
