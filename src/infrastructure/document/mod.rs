mod lopdf_page_segmenter;

pub use lopdf_page_segmenter::LopdfPageSegmenter;
