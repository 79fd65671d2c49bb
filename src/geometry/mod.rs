// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - mesh buffers, keys and fixture solids

mod bbox;
mod keys;
mod mesh;
mod primitives;

pub use bbox::BoundingBox;
pub use keys::{EdgeKey, VertexKey};
pub use mesh::{Ingested, MeshBuffer, Triangle};
pub use primitives::{builtin, Primitive, BUILTIN_NAMES};
