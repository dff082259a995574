//! Vulkan swapchain management
//!
//! Swapchain images are only ever written by transfer commands (clear and
//! blit), so no image views or render passes are created for them.

use crate::render::vulkan::context::VulkanContext;
use crate::render::vulkan::{VulkanError, VulkanResult};
use ash::extensions::khr::Swapchain as SwapchainLoader;
use ash::vk;

/// Swapchain wrapper, destroyed when dropped
pub struct Swapchain {
    loader: SwapchainLoader,
    swapchain: vk::SwapchainKHR,
    images: Vec<vk::Image>,
    extent: vk::Extent2D,
}

impl Swapchain {
    /// Create a swapchain for the context's surface
    ///
    /// `window_extent` is used when the surface leaves the size to us. Pass
    /// the previous handle as `old_swapchain` when recreating.
    pub fn new(
        context: &VulkanContext,
        window_extent: vk::Extent2D,
        vsync: bool,
        old_swapchain: vk::SwapchainKHR,
    ) -> VulkanResult<Self> {
        let physical_device = context.physical_device.device;
        let surface = context.surface;
        let surface_loader = &context.surface_loader;
        let loader = SwapchainLoader::new(context.instance(), context.device());

        let surface_caps = unsafe {
            surface_loader
                .get_physical_device_surface_capabilities(physical_device, surface)
                .map_err(VulkanError::Api)?
        };
        if !surface_caps
            .supported_usage_flags
            .contains(vk::ImageUsageFlags::TRANSFER_DST)
        {
            return Err(VulkanError::Unsupported("surface images as transfer destination".to_string()));
        }

        let surface_formats = unsafe {
            surface_loader
                .get_physical_device_surface_formats(physical_device, surface)
                .map_err(VulkanError::Api)?
        };
        let format = choose_format(&surface_formats, |format| {
            context.physical_device.supports_blit_dst(context.instance(), format)
        })
        .ok_or_else(|| VulkanError::Unsupported("no surface format accepts blits".to_string()))?;

        let present_modes = unsafe {
            surface_loader
                .get_physical_device_surface_present_modes(physical_device, surface)
                .map_err(VulkanError::Api)?
        };
        let present_mode = choose_present_mode(&present_modes, vsync);

        let extent = choose_extent(&surface_caps, window_extent).ok_or(VulkanError::ZeroExtent)?;

        let image_count = if surface_caps.max_image_count > 0 {
            (surface_caps.min_image_count + 1).min(surface_caps.max_image_count)
        } else {
            surface_caps.min_image_count + 1
        };

        let graphics_family = context.physical_device.graphics_family;
        let present_family = context.physical_device.present_family;
        let families = [graphics_family, present_family];

        let mut create_info = vk::SwapchainCreateInfoKHR::builder()
            .surface(surface)
            .min_image_count(image_count)
            .image_format(format.format)
            .image_color_space(format.color_space)
            .image_extent(extent)
            .image_array_layers(1)
            .image_usage(vk::ImageUsageFlags::TRANSFER_DST)
            .pre_transform(surface_caps.current_transform)
            .composite_alpha(vk::CompositeAlphaFlagsKHR::OPAQUE)
            .present_mode(present_mode)
            .clipped(true)
            .old_swapchain(old_swapchain);

        create_info = if graphics_family == present_family {
            create_info.image_sharing_mode(vk::SharingMode::EXCLUSIVE)
        } else {
            create_info
                .image_sharing_mode(vk::SharingMode::CONCURRENT)
                .queue_family_indices(&families)
        };

        let swapchain = unsafe {
            loader
                .create_swapchain(&create_info, None)
                .map_err(VulkanError::Api)?
        };

        let images = match unsafe { loader.get_swapchain_images(swapchain) } {
            Ok(images) => images,
            Err(e) => {
                unsafe { loader.destroy_swapchain(swapchain, None) };
                return Err(VulkanError::Api(e));
            }
        };

        log::debug!(
            "Swapchain {}x{} with {} images, {:?}, {:?}",
            extent.width,
            extent.height,
            images.len(),
            format.format,
            present_mode
        );

        Ok(Self {
            loader,
            swapchain,
            images,
            extent,
        })
    }

    /// Get swapchain extent
    pub fn extent(&self) -> vk::Extent2D {
        self.extent
    }

    /// Image at `index`
    pub fn image(&self, index: u32) -> vk::Image {
        self.images[index as usize]
    }

    /// Get swapchain handle
    pub fn handle(&self) -> vk::SwapchainKHR {
        self.swapchain
    }

    /// Get swapchain loader
    pub fn loader(&self) -> &SwapchainLoader {
        &self.loader
    }
}

impl Drop for Swapchain {
    fn drop(&mut self) {
        unsafe {
            self.loader.destroy_swapchain(self.swapchain, None);
        }
    }
}

/// Image size for the swapchain, `None` while the surface has no area
///
/// A minimized window reports a 0x0 surface, which `vkCreateSwapchainKHR`
/// does not accept.
fn choose_extent(caps: &vk::SurfaceCapabilitiesKHR, window_extent: vk::Extent2D) -> Option<vk::Extent2D> {
    let extent = if caps.current_extent.width == u32::MAX {
        vk::Extent2D {
            width: window_extent
                .width
                .clamp(caps.min_image_extent.width, caps.max_image_extent.width),
            height: window_extent
                .height
                .clamp(caps.min_image_extent.height, caps.max_image_extent.height),
        }
    } else {
        caps.current_extent
    };
    (extent.width > 0 && extent.height > 0).then_some(extent)
}

/// Prefer 8-bit BGRA in sRGB color space, else any blittable format
fn choose_format(
    formats: &[vk::SurfaceFormatKHR],
    blittable: impl Fn(vk::Format) -> bool,
) -> Option<vk::SurfaceFormatKHR> {
    let preferred = formats.iter().find(|sf| {
        sf.format == vk::Format::B8G8R8A8_UNORM && sf.color_space == vk::ColorSpaceKHR::SRGB_NONLINEAR
    });
    preferred
        .filter(|sf| blittable(sf.format))
        .or_else(|| formats.iter().find(|sf| blittable(sf.format)))
        .copied()
}

/// FIFO waits for vertical blank; otherwise take the lowest-latency mode offered
fn choose_present_mode(modes: &[vk::PresentModeKHR], vsync: bool) -> vk::PresentModeKHR {
    if vsync {
        return vk::PresentModeKHR::FIFO;
    }
    [vk::PresentModeKHR::MAILBOX, vk::PresentModeKHR::IMMEDIATE]
        .into_iter()
        .find(|mode| modes.contains(mode))
        .unwrap_or(vk::PresentModeKHR::FIFO)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface_format(format: vk::Format) -> vk::SurfaceFormatKHR {
        vk::SurfaceFormatKHR {
            format,
            color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR,
        }
    }

    #[test]
    fn test_minimized_surface_has_no_extent() {
        let window = vk::Extent2D { width: 640, height: 480 };
        let mut caps = vk::SurfaceCapabilitiesKHR {
            current_extent: vk::Extent2D { width: 0, height: 0 },
            ..Default::default()
        };
        assert_eq!(choose_extent(&caps, window), None);

        caps.current_extent = window;
        assert_eq!(choose_extent(&caps, window), Some(window));

        caps.current_extent = vk::Extent2D { width: u32::MAX, height: u32::MAX };
        caps.min_image_extent = vk::Extent2D { width: 1, height: 1 };
        caps.max_image_extent = vk::Extent2D { width: 4096, height: 4096 };
        assert_eq!(choose_extent(&caps, window), Some(window));
        assert_eq!(choose_extent(&caps, vk::Extent2D { width: 0, height: 0 }), Some(vk::Extent2D { width: 1, height: 1 }));

        caps.min_image_extent = vk::Extent2D { width: 0, height: 0 };
        assert_eq!(choose_extent(&caps, vk::Extent2D { width: 0, height: 0 }), None);
    }

    #[test]
    fn test_vsync_always_uses_fifo() {
        let modes = [vk::PresentModeKHR::MAILBOX, vk::PresentModeKHR::FIFO];
        assert_eq!(choose_present_mode(&modes, true), vk::PresentModeKHR::FIFO);
        assert_eq!(choose_present_mode(&modes, false), vk::PresentModeKHR::MAILBOX);
        assert_eq!(choose_present_mode(&[vk::PresentModeKHR::FIFO], false), vk::PresentModeKHR::FIFO);
    }

    #[test]
    fn test_format_choice() {
        let formats = [
            surface_format(vk::Format::A2B10G10R10_UNORM_PACK32),
            surface_format(vk::Format::B8G8R8A8_UNORM),
        ];
        assert_eq!(
            choose_format(&formats, |_| true).map(|sf| sf.format),
            Some(vk::Format::B8G8R8A8_UNORM)
        );
        assert_eq!(
            choose_format(&formats, |f| f == vk::Format::A2B10G10R10_UNORM_PACK32).map(|sf| sf.format),
            Some(vk::Format::A2B10G10R10_UNORM_PACK32)
        );
        assert!(choose_format(&formats, |_| false).is_none());
    }
}
