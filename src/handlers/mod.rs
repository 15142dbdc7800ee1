pub mod detailed_scan;
pub mod llava_scan;
pub mod quick_scan;

pub use detailed_scan::DetailedScanHandler;
pub use llava_scan::LlavaScanHandler;
pub use quick_scan::QuickScanHandler;
