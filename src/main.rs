// Copyright 2025 the Glyphweaver Authors
// SPDX-License-Identifier: Apache-2.0

//! Glyphweaver: a glyph-grid font editor driven from the terminal

fn main() -> anyhow::Result<()> {
    glyphweaver::run()
}
