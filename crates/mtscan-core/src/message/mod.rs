//! SWIFT message extraction: segmentation, classification, field
//! extraction and enrichment.

pub mod classifier;
pub mod enricher;
pub mod extractors;
pub mod pipeline;
pub mod rules;
pub mod segmenter;

pub use classifier::{classify, Classification};
pub use enricher::Enricher;
pub use extractors::{extractor_for, party_strategy, ExtractContext, MessageExtractor, ParsedBlock};
pub use pipeline::Pipeline;
pub use segmenter::{segment, MessageBlock, Segments};
