// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Basic structures used to describe molecular systems.

pub mod atom;
pub mod group;
pub mod simbox;
pub mod vector3d;
