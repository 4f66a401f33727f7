// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod forms;
pub mod ids;
pub mod model;
pub mod normalize;
pub mod state;

pub use forms::*;
pub use ids::*;
pub use model::*;
pub use normalize::*;
pub use state::*;
