pub type DataIndex = u32;

/// Sentinel index for an absent node. Absent nodes are black leaves.
pub const NIL: DataIndex = DataIndex::MAX;

#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => {
        #[cfg(feature = "trace")]
        {
            ::log::trace!("[{}:{}] {}", std::file!(), std::line!(), std::format_args!($($arg)*));
        }
    };
}

