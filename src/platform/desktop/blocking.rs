/// Seam for synchronous service calls made from UI handlers. Desktop runs
/// them inline on the UI thread.
pub fn run_blocking<F, T>(f: F) -> T
where
    F: FnOnce() -> T,
{
    f()
}
