//! Procedural textures. The demo ships no binary image assets; the gold
//! and clay surfaces are small noise textures generated at startup from a
//! fixed seed.

use defocus_common::Prng;

const TEXTURE_SIZE: u32 = 64;

/// Generate RGBA8 noise around a base color. `variation` is the maximum
/// per-channel jitter.
fn noise_texels(base: [u8; 3], variation: i16, seed: u64) -> Vec<u8> {
    let mut rng = Prng::new(seed);
    let mut data = Vec::with_capacity((TEXTURE_SIZE * TEXTURE_SIZE * 4) as usize);
    for _ in 0..TEXTURE_SIZE * TEXTURE_SIZE {
        let jitter = (rng.range_f32(-1.0, 1.0) * variation as f32) as i16;
        for channel in base {
            data.push((channel as i16 + jitter).clamp(0, 255) as u8);
        }
        data.push(255);
    }
    data
}

fn upload(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    data: &[u8],
) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: TEXTURE_SIZE,
            height: TEXTURE_SIZE,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        data,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * TEXTURE_SIZE),
            rows_per_image: Some(TEXTURE_SIZE),
        },
        wgpu::Extent3d {
            width: TEXTURE_SIZE,
            height: TEXTURE_SIZE,
            depth_or_array_layers: 1,
        },
    );
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

/// Warm metallic surface for the teapots.
pub fn create_gold_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> (wgpu::Texture, wgpu::TextureView) {
    upload(device, queue, "gold", &noise_texels([212, 168, 84], 18, 0x601d))
}

/// Matte surface for the background sphere.
pub fn create_clay_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> (wgpu::Texture, wgpu::TextureView) {
    upload(device, queue, "clay", &noise_texels([168, 132, 112], 12, 0xc1a7))
}

/// Shared linear clamp sampler.
pub fn create_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("linear_clamp"),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noise_texels_cover_the_texture() {
        let data = noise_texels([212, 168, 84], 18, 1);
        assert_eq!(data.len(), (TEXTURE_SIZE * TEXTURE_SIZE * 4) as usize);
        // Alpha stays opaque.
        assert!(data.chunks_exact(4).all(|px| px[3] == 255));
    }

    #[test]
    fn noise_is_deterministic() {
        assert_eq!(noise_texels([100, 100, 100], 10, 7), noise_texels([100, 100, 100], 10, 7));
    }

    #[test]
    fn variation_stays_near_base() {
        let data = noise_texels([128, 128, 128], 10, 3);
        for px in data.chunks_exact(4) {
            for &c in &px[..3] {
                assert!((118..=138).contains(&c));
            }
        }
    }
}
