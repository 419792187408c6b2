//! Frame Capture
//!
//! Reads the offscreen frame back to the CPU for snapshot export. Texture to
//! buffer copies need rows padded to `COPY_BYTES_PER_ROW_ALIGNMENT`, so the
//! padding is stripped again after mapping.

use image::RgbaImage;

use crate::studio::error::{StudioError, StudioResult};

const BYTES_PER_PIXEL: u32 = 4;

/// Row pitch for a copy of `width` RGBA pixels.
pub fn padded_bytes_per_row(width: u32) -> u32 {
    let unpadded = width * BYTES_PER_PIXEL;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}

/// Drop the per-row padding from a mapped readback buffer.
pub fn unpad_rows(data: &[u8], width: u32, height: u32, padded_row: u32) -> StudioResult<Vec<u8>> {
    let row = (width * BYTES_PER_PIXEL) as usize;
    let padded_row = padded_row as usize;
    let needed = padded_row * height.saturating_sub(1) as usize + row;
    if height > 0 && data.len() < needed {
        return Err(StudioError::capture(format!(
            "readback buffer too small: {} < {needed}",
            data.len()
        )));
    }
    let mut pixels = Vec::with_capacity(row * height as usize);
    for y in 0..height as usize {
        let start = y * padded_row;
        pixels.extend_from_slice(&data[start..start + row]);
    }
    Ok(pixels)
}

/// Copy `texture` into a mappable buffer and block until it can be read.
#[cfg(not(target_arch = "wasm32"))]
pub fn read_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    texture: &wgpu::Texture,
    width: u32,
    height: u32,
) -> StudioResult<RgbaImage> {
    let padded_row = padded_bytes_per_row(width);
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Snapshot Readback"),
        size: padded_row as u64 * height as u64,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("Snapshot Encoder"),
    });
    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &buffer,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(padded_row),
                rows_per_image: Some(height),
            },
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
    queue.submit(Some(encoder.finish()));

    let slice = buffer.slice(..);
    let (tx, rx) = std::sync::mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = tx.send(result);
    });
    device
        .poll(wgpu::PollType::wait_indefinitely())
        .map_err(|e| StudioError::capture(format!("device poll failed: {e:?}")))?;
    rx.recv()
        .map_err(|_| StudioError::capture("readback callback dropped"))?
        .map_err(|e| StudioError::capture(format!("buffer map failed: {e:?}")))?;

    let pixels = {
        let mapped = slice.get_mapped_range();
        unpad_rows(&mapped, width, height, padded_row)?
    };
    buffer.unmap();

    RgbaImage::from_raw(width, height, pixels)
        .ok_or_else(|| StudioError::capture("readback size mismatch"))
}
