//! Chess rules engine driven by long algebraic notation. For more information,
//! see [README].
//!
//! The entry point for most users is [`chess::game::Game`]: it decodes moves
//! such as `e2-e4`, `Ng1xf3` or `O-O-O`, validates them against the board and
//! commits them. The building blocks (board, move generation, check
//! detection, castling, en passant) are usable on their own.
//!
//! [README]: https://github.com/lancer-chess/lancer/blob/main/README.md

#![warn(missing_docs, variant_size_differences)]
// Rustdoc lints.
#![warn(
    rustdoc::missing_crate_level_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::invalid_codeblock_attributes,
    rustdoc::invalid_html_tags,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::bare_urls
)]
// Performance matters: perft walks millions of nodes.
#![deny(clippy::perf)]

pub mod chess;
