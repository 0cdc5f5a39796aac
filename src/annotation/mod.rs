mod aggregator;
mod color;
mod highlight;
mod view;

pub use aggregator::{SentenceAggregator, SentenceBreakdown};
pub use color::{known_labels, palette_color, ColorProfile, Rgb, Rgba, FALLBACK_COLOR, WASH_ALPHA};
pub use highlight::{classify_chars, HighlightRenderer, RenderPlan, Segment, SegmentKind};
pub use view::{
    EntityCard, EntityListing, EntityTag, NerView, PredictionView, RankedPrediction, ResultView,
    SentenceView, StyledSegment, ViewProfile,
};
