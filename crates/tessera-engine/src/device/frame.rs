use crate::coords::SurfaceSize;

/// One acquired window frame.
///
/// Short-lived: holding the surface texture blocks acquisition of the next
/// frame, so the runtime submits it in the same callback that acquired it.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
    /// Size of the window texture in physical pixels.
    pub size: SurfaceSize,
}
