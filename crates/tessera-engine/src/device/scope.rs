/// Runs `f` inside a validation error scope.
///
/// Returns what `f` produced and the first validation error it raised, if
/// any. Errors caught here never reach the device's uncaptured-error handler.
pub(crate) fn validated<T>(device: &wgpu::Device, f: impl FnOnce() -> T) -> (T, Option<wgpu::Error>) {
    let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
    let value = f();
    let error = pollster::block_on(scope.pop());
    (value, error)
}
