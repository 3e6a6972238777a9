//! ClubRAG - question answering over a small club information corpus
//!
//! # Architecture
//!
//! ```text
//! club_data.txt -> Corpus -> Embedder -> VectorIndex
//!                    |                      |
//!                    +-> SpecialModes       |
//!                             |             |
//! Query -> classify -> Assistant ----> SearchEngine
//!                          |
//!                   CompletionService -> Answer
//! ```
//!
//! # Example
//!
//! ```ignore
//! use clubrag_lib::{
//!     assistant::Assistant, complete::ChatCompletionsClient, config::Config,
//!     corpus::Corpus, embed::OnnxEmbedder,
//! };
//!
//! let config = Config::default();
//! let corpus = Corpus::from_path(&config.corpus.path, config.corpus.min_chars)?;
//! let embedder = OnnxEmbedder::new(&config.embedding.model)?;
//! let completion = ChatCompletionsClient::from_env(&config.completion)?;
//!
//! let mut assistant = Assistant::build(&corpus, embedder, completion, &config)?;
//! let answer = assistant.answer("When is the next meetup?")?;
//! println!("{}", answer.response);
//! ```

pub mod assistant;
pub mod chunk;
pub mod complete;
pub mod config;
pub mod corpus;
pub mod embed;
pub mod error;
pub mod index;
pub mod intent;
pub mod modes;
pub mod search;

#[cfg(test)]
mod testing;

pub use error::{CompletionError, Error, Result};
