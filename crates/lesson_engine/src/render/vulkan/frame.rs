//! Per-frame command recording and presentation
//!
//! One frame is in flight at a time. The frame starts on the first clear or
//! copy after a present: that waits for the previous frame, acquires a
//! swapchain image and moves it to `TRANSFER_DST_OPTIMAL`. Every clear and
//! copy is then recorded as a transfer command, and `present` submits it all.

use crate::foundation::geometry::{clip_copy, Rect};
use crate::render::vulkan::context::VulkanContext;
use crate::render::vulkan::swapchain::Swapchain;
use crate::render::vulkan::texture::GpuTexture;
use crate::render::vulkan::{VulkanError, VulkanResult};
use ash::{vk, Device};

const COLOR_RANGE: vk::ImageSubresourceRange = vk::ImageSubresourceRange {
    aspect_mask: vk::ImageAspectFlags::COLOR,
    base_mip_level: 0,
    level_count: 1,
    base_array_layer: 0,
    layer_count: 1,
};

const COLOR_LAYERS: vk::ImageSubresourceLayers = vk::ImageSubresourceLayers {
    aspect_mask: vk::ImageAspectFlags::COLOR,
    mip_level: 0,
    base_array_layer: 0,
    layer_count: 1,
};

/// What `present` found out about the swapchain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentOutcome {
    /// Frame shown, swapchain still matches the surface
    Presented,
    /// The swapchain must be rebuilt before the next frame
    Stale,
}

/// Semaphores, fence and command buffer for the frame in flight
pub struct FrameSync {
    device: Device,
    command_buffer: vk::CommandBuffer,
    image_available: vk::Semaphore,
    render_finished: vk::Semaphore,
    in_flight: vk::Fence,
    recording: Option<u32>,
}

impl FrameSync {
    /// Create the sync objects; the fence starts signaled
    pub fn new(context: &VulkanContext) -> VulkanResult<Self> {
        let device = context.device().clone();

        let allocate_info = vk::CommandBufferAllocateInfo::builder()
            .command_pool(context.command_pool)
            .level(vk::CommandBufferLevel::PRIMARY)
            .command_buffer_count(1);
        let command_buffer = unsafe { device.allocate_command_buffers(&allocate_info).map_err(VulkanError::Api)?[0] };

        let mut sync = Self {
            device,
            command_buffer,
            image_available: vk::Semaphore::null(),
            render_finished: vk::Semaphore::null(),
            in_flight: vk::Fence::null(),
            recording: None,
        };

        let semaphore_info = vk::SemaphoreCreateInfo::builder();
        let fence_info = vk::FenceCreateInfo::builder().flags(vk::FenceCreateFlags::SIGNALED);
        unsafe {
            sync.image_available = sync
                .device
                .create_semaphore(&semaphore_info, None)
                .map_err(VulkanError::Api)?;
            sync.render_finished = sync
                .device
                .create_semaphore(&semaphore_info, None)
                .map_err(VulkanError::Api)?;
            sync.in_flight = sync.device.create_fence(&fence_info, None).map_err(VulkanError::Api)?;
        }

        Ok(sync)
    }

    /// Whether commands are being recorded for an acquired image
    pub fn is_recording(&self) -> bool {
        self.recording.is_some()
    }

    /// Start a frame unless one is already being recorded
    ///
    /// Returns [`PresentOutcome::Stale`] when no image could be acquired
    /// because the swapchain no longer matches the surface.
    pub fn begin(&mut self, swapchain: &Swapchain) -> VulkanResult<PresentOutcome> {
        if self.recording.is_some() {
            return Ok(PresentOutcome::Presented);
        }

        let device = &self.device;
        unsafe {
            device
                .wait_for_fences(&[self.in_flight], true, u64::MAX)
                .map_err(VulkanError::Api)?;
        }

        let acquired = unsafe {
            swapchain
                .loader()
                .acquire_next_image(swapchain.handle(), u64::MAX, self.image_available, vk::Fence::null())
        };
        let image_index = match acquired {
            Ok((index, _suboptimal)) => index,
            Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => return Ok(PresentOutcome::Stale),
            Err(e) => return Err(VulkanError::Api(e)),
        };

        let begin_info = vk::CommandBufferBeginInfo::builder().flags(vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT);
        let to_transfer_dst = image_barrier(
            swapchain.image(image_index),
            vk::ImageLayout::UNDEFINED,
            vk::ImageLayout::TRANSFER_DST_OPTIMAL,
            vk::AccessFlags::empty(),
            vk::AccessFlags::TRANSFER_WRITE,
        );

        unsafe {
            device.reset_fences(&[self.in_flight]).map_err(VulkanError::Api)?;
            device
                .reset_command_buffer(self.command_buffer, vk::CommandBufferResetFlags::empty())
                .map_err(VulkanError::Api)?;
            device
                .begin_command_buffer(self.command_buffer, &begin_info)
                .map_err(VulkanError::Api)?;
            device.cmd_pipeline_barrier(
                self.command_buffer,
                vk::PipelineStageFlags::TRANSFER,
                vk::PipelineStageFlags::TRANSFER,
                vk::DependencyFlags::empty(),
                &[],
                &[],
                &[to_transfer_dst],
            );
        }

        self.recording = Some(image_index);
        Ok(PresentOutcome::Presented)
    }

    /// Fill the acquired image with `color`
    pub fn clear(&self, swapchain: &Swapchain, color: [u8; 4]) -> VulkanResult<()> {
        let image = self.target(swapchain)?;
        let clear_value = vk::ClearColorValue {
            float32: color.map(|channel| f32::from(channel) / 255.0),
        };

        unsafe {
            self.device.cmd_clear_color_image(
                self.command_buffer,
                image,
                vk::ImageLayout::TRANSFER_DST_OPTIMAL,
                &clear_value,
                &[COLOR_RANGE],
            );
        }
        self.order_transfer_writes();
        Ok(())
    }

    /// Blit `texture` into `dst`, clipped to the swapchain image
    pub fn blit(&self, swapchain: &Swapchain, texture: &GpuTexture, dst: Rect) -> VulkanResult<()> {
        let image = self.target(swapchain)?;
        let src = texture.extent();
        let target = swapchain.extent();

        let Some(region) = clip_copy(src.width, src.height, dst, target.width, target.height) else {
            return Ok(());
        };

        let blit = vk::ImageBlit {
            src_subresource: COLOR_LAYERS,
            src_offsets: corners(region.src),
            dst_subresource: COLOR_LAYERS,
            dst_offsets: corners(region.dst),
        };

        unsafe {
            self.device.cmd_blit_image(
                self.command_buffer,
                texture.image(),
                vk::ImageLayout::TRANSFER_SRC_OPTIMAL,
                image,
                vk::ImageLayout::TRANSFER_DST_OPTIMAL,
                &[blit],
                vk::Filter::NEAREST,
            );
        }
        self.order_transfer_writes();
        Ok(())
    }

    /// Submit the recorded frame and queue it for presentation
    pub fn present(&mut self, context: &VulkanContext, swapchain: &Swapchain) -> VulkanResult<PresentOutcome> {
        let image_index = self
            .recording
            .take()
            .ok_or_else(|| VulkanError::InvalidOperation("present without an acquired image".into()))?;
        let device = &self.device;

        let to_present = image_barrier(
            swapchain.image(image_index),
            vk::ImageLayout::TRANSFER_DST_OPTIMAL,
            vk::ImageLayout::PRESENT_SRC_KHR,
            vk::AccessFlags::TRANSFER_WRITE,
            vk::AccessFlags::empty(),
        );

        let wait_semaphores = [self.image_available];
        let wait_stages = [vk::PipelineStageFlags::TRANSFER];
        let signal_semaphores = [self.render_finished];
        let command_buffers = [self.command_buffer];
        let submit_info = vk::SubmitInfo::builder()
            .wait_semaphores(&wait_semaphores)
            .wait_dst_stage_mask(&wait_stages)
            .command_buffers(&command_buffers)
            .signal_semaphores(&signal_semaphores);

        unsafe {
            device.cmd_pipeline_barrier(
                self.command_buffer,
                vk::PipelineStageFlags::TRANSFER,
                vk::PipelineStageFlags::BOTTOM_OF_PIPE,
                vk::DependencyFlags::empty(),
                &[],
                &[],
                &[to_present],
            );
            device.end_command_buffer(self.command_buffer).map_err(VulkanError::Api)?;
            device
                .queue_submit(context.device.graphics_queue, &[submit_info.build()], self.in_flight)
                .map_err(VulkanError::Api)?;
        }

        let swapchains = [swapchain.handle()];
        let image_indices = [image_index];
        let present_info = vk::PresentInfoKHR::builder()
            .wait_semaphores(&signal_semaphores)
            .swapchains(&swapchains)
            .image_indices(&image_indices);

        let presented = unsafe {
            swapchain
                .loader()
                .queue_present(context.device.present_queue, &present_info)
        };
        match presented {
            Ok(false) => Ok(PresentOutcome::Presented),
            Ok(true) | Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => Ok(PresentOutcome::Stale),
            Err(e) => Err(VulkanError::Api(e)),
        }
    }

    fn target(&self, swapchain: &Swapchain) -> VulkanResult<vk::Image> {
        self.recording
            .map(|index| swapchain.image(index))
            .ok_or_else(|| VulkanError::InvalidOperation("no frame is being recorded".into()))
    }

    /// Later transfers must land on top of earlier ones
    fn order_transfer_writes(&self) {
        let barrier = vk::MemoryBarrier::builder()
            .src_access_mask(vk::AccessFlags::TRANSFER_WRITE)
            .dst_access_mask(vk::AccessFlags::TRANSFER_WRITE | vk::AccessFlags::TRANSFER_READ);
        unsafe {
            self.device.cmd_pipeline_barrier(
                self.command_buffer,
                vk::PipelineStageFlags::TRANSFER,
                vk::PipelineStageFlags::TRANSFER,
                vk::DependencyFlags::empty(),
                &[barrier.build()],
                &[],
                &[],
            );
        }
    }
}

impl Drop for FrameSync {
    fn drop(&mut self) {
        unsafe {
            let _ = self.device.device_wait_idle();
            self.device.destroy_fence(self.in_flight, None);
            self.device.destroy_semaphore(self.render_finished, None);
            self.device.destroy_semaphore(self.image_available, None);
        }
        // The command buffer goes with its pool
    }
}

fn image_barrier(
    image: vk::Image,
    old_layout: vk::ImageLayout,
    new_layout: vk::ImageLayout,
    src_access: vk::AccessFlags,
    dst_access: vk::AccessFlags,
) -> vk::ImageMemoryBarrier {
    vk::ImageMemoryBarrier::builder()
        .old_layout(old_layout)
        .new_layout(new_layout)
        .src_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
        .dst_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
        .image(image)
        .subresource_range(COLOR_RANGE)
        .src_access_mask(src_access)
        .dst_access_mask(dst_access)
        .build()
}

/// Blit offsets for the top-left and bottom-right corners of `rect`
fn corners(rect: Rect) -> [vk::Offset3D; 2] {
    [
        vk::Offset3D {
            x: rect.x,
            y: rect.y,
            z: 0,
        },
        vk::Offset3D {
            x: rect.right() as i32,
            y: rect.bottom() as i32,
            z: 1,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blit_corners() {
        let [top_left, bottom_right] = corners(Rect::new(10, 20, 30, 40));
        assert_eq!((top_left.x, top_left.y, top_left.z), (10, 20, 0));
        assert_eq!((bottom_right.x, bottom_right.y, bottom_right.z), (40, 60, 1));
    }
}
