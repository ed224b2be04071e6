// SPDX-FileCopyrightText: 2024 Keita Kita <maoutwo@gmail.com>
//
// SPDX-License-Identifier: MIT

pub mod batch;
pub mod fetch_song_metadata;
pub mod report;
pub mod resolve_error;
pub mod resolver;
pub mod song;
pub mod spotify;
