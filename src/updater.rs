/// Handle to a task running in the background
pub trait UpdaterExt {
    type Error;
    type Status;
    type Result;

    /// Check task's status
    fn status(&mut self) -> Result<Self::Status, &Self::Error>;

    /// Wait for task to complete
    fn wait(self) -> Result<Self::Result, Self::Error>;

    /// Check if task is finished, either successfully or not
    fn is_finished(&mut self) -> bool;

    /// Get current progress
    fn current(&self) -> u64;

    /// Get total progress
    fn total(&self) -> u64;

    #[inline]
    /// Get progress, `0.0` if the total is unknown
    fn progress(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.current() as f64 / total as f64
        }
    }
}
