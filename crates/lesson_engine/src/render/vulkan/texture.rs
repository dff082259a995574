//! GPU textures
//!
//! Pixels are uploaded once through a staging buffer and the image is then
//! left in `TRANSFER_SRC_OPTIMAL`, ready to be blitted every frame.

use crate::assets::ImageData;
use crate::render::vulkan::context::{VulkanContext, TEXTURE_FORMAT};
use crate::render::vulkan::{VulkanError, VulkanResult};
use ash::{vk, Device};

const COLOR_RANGE: vk::ImageSubresourceRange = vk::ImageSubresourceRange {
    aspect_mask: vk::ImageAspectFlags::COLOR,
    base_mip_level: 0,
    level_count: 1,
    base_array_layer: 0,
    layer_count: 1,
};

/// Device-local RGBA8 image
pub struct GpuTexture {
    device: Device,
    image: vk::Image,
    memory: vk::DeviceMemory,
    extent: vk::Extent2D,
}

impl GpuTexture {
    /// Create a texture from decoded image data
    pub fn from_image_data(context: &VulkanContext, image_data: &ImageData) -> VulkanResult<Self> {
        let extent = vk::Extent2D {
            width: image_data.width,
            height: image_data.height,
        };
        if extent.width == 0 || extent.height == 0 {
            return Err(VulkanError::InvalidOperation("empty image".to_string()));
        }

        let device = context.device().clone();
        let image_create_info = vk::ImageCreateInfo::builder()
            .image_type(vk::ImageType::TYPE_2D)
            .extent(vk::Extent3D {
                width: extent.width,
                height: extent.height,
                depth: 1,
            })
            .mip_levels(1)
            .array_layers(1)
            .format(TEXTURE_FORMAT)
            .tiling(vk::ImageTiling::OPTIMAL)
            .initial_layout(vk::ImageLayout::UNDEFINED)
            .usage(vk::ImageUsageFlags::TRANSFER_DST | vk::ImageUsageFlags::TRANSFER_SRC)
            .sharing_mode(vk::SharingMode::EXCLUSIVE)
            .samples(vk::SampleCountFlags::TYPE_1);

        let image = unsafe { device.create_image(&image_create_info, None).map_err(VulkanError::Api)? };

        let memory = match Self::allocate_and_bind(context, &device, image) {
            Ok(memory) => memory,
            Err(e) => {
                unsafe { device.destroy_image(image, None) };
                return Err(e);
            }
        };

        // From here on Drop releases the image and its memory
        let texture = Self {
            device,
            image,
            memory,
            extent,
        };
        texture.upload(context, &image_data.data)?;

        log::debug!("Created {}x{} GPU texture", extent.width, extent.height);
        Ok(texture)
    }

    fn allocate_and_bind(context: &VulkanContext, device: &Device, image: vk::Image) -> VulkanResult<vk::DeviceMemory> {
        let memory_requirements = unsafe { device.get_image_memory_requirements(image) };
        let memory_type_index = context
            .physical_device
            .find_memory_type(memory_requirements.memory_type_bits, vk::MemoryPropertyFlags::DEVICE_LOCAL)?;

        let memory_allocate_info = vk::MemoryAllocateInfo::builder()
            .allocation_size(memory_requirements.size)
            .memory_type_index(memory_type_index);

        let memory = unsafe { device.allocate_memory(&memory_allocate_info, None).map_err(VulkanError::Api)? };
        if let Err(e) = unsafe { device.bind_image_memory(image, memory, 0) } {
            unsafe { device.free_memory(memory, None) };
            return Err(VulkanError::Api(e));
        }
        Ok(memory)
    }

    fn upload(&self, context: &VulkanContext, pixels: &[u8]) -> VulkanResult<()> {
        let staging = StagingBuffer::new(context, pixels)?;
        let image = self.image;
        let extent = self.extent;

        context.submit_once(|device, command_buffer| {
            let to_transfer_dst = vk::ImageMemoryBarrier::builder()
                .old_layout(vk::ImageLayout::UNDEFINED)
                .new_layout(vk::ImageLayout::TRANSFER_DST_OPTIMAL)
                .src_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
                .dst_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
                .image(image)
                .subresource_range(COLOR_RANGE)
                .src_access_mask(vk::AccessFlags::empty())
                .dst_access_mask(vk::AccessFlags::TRANSFER_WRITE);

            let region = vk::BufferImageCopy::builder()
                .buffer_offset(0)
                .buffer_row_length(0)
                .buffer_image_height(0)
                .image_subresource(vk::ImageSubresourceLayers {
                    aspect_mask: vk::ImageAspectFlags::COLOR,
                    mip_level: 0,
                    base_array_layer: 0,
                    layer_count: 1,
                })
                .image_offset(vk::Offset3D { x: 0, y: 0, z: 0 })
                .image_extent(vk::Extent3D {
                    width: extent.width,
                    height: extent.height,
                    depth: 1,
                });

            let to_transfer_src = vk::ImageMemoryBarrier::builder()
                .old_layout(vk::ImageLayout::TRANSFER_DST_OPTIMAL)
                .new_layout(vk::ImageLayout::TRANSFER_SRC_OPTIMAL)
                .src_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
                .dst_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
                .image(image)
                .subresource_range(COLOR_RANGE)
                .src_access_mask(vk::AccessFlags::TRANSFER_WRITE)
                .dst_access_mask(vk::AccessFlags::TRANSFER_READ);

            unsafe {
                device.cmd_pipeline_barrier(
                    command_buffer,
                    vk::PipelineStageFlags::TOP_OF_PIPE,
                    vk::PipelineStageFlags::TRANSFER,
                    vk::DependencyFlags::empty(),
                    &[],
                    &[],
                    &[to_transfer_dst.build()],
                );
                device.cmd_copy_buffer_to_image(
                    command_buffer,
                    staging.buffer,
                    image,
                    vk::ImageLayout::TRANSFER_DST_OPTIMAL,
                    &[region.build()],
                );
                device.cmd_pipeline_barrier(
                    command_buffer,
                    vk::PipelineStageFlags::TRANSFER,
                    vk::PipelineStageFlags::TRANSFER,
                    vk::DependencyFlags::empty(),
                    &[],
                    &[],
                    &[to_transfer_src.build()],
                );
            }
        })
    }

    /// Vulkan image handle
    pub fn image(&self) -> vk::Image {
        self.image
    }

    /// Size in texels
    pub fn extent(&self) -> vk::Extent2D {
        self.extent
    }
}

impl Drop for GpuTexture {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_image(self.image, None);
            self.device.free_memory(self.memory, None);
        }
    }
}

/// Host-visible buffer holding pixels on their way to an image
struct StagingBuffer {
    device: Device,
    buffer: vk::Buffer,
    memory: vk::DeviceMemory,
}

impl StagingBuffer {
    fn new(context: &VulkanContext, bytes: &[u8]) -> VulkanResult<Self> {
        let device = context.device().clone();
        let buffer_size = bytes.len() as vk::DeviceSize;

        let create_info = vk::BufferCreateInfo::builder()
            .size(buffer_size)
            .usage(vk::BufferUsageFlags::TRANSFER_SRC)
            .sharing_mode(vk::SharingMode::EXCLUSIVE);
        let buffer = unsafe { device.create_buffer(&create_info, None).map_err(VulkanError::Api)? };

        let mut staging = Self {
            device,
            buffer,
            memory: vk::DeviceMemory::null(),
        };

        let memory_requirements = unsafe { staging.device.get_buffer_memory_requirements(buffer) };
        let memory_type_index = context.physical_device.find_memory_type(
            memory_requirements.memory_type_bits,
            vk::MemoryPropertyFlags::HOST_VISIBLE | vk::MemoryPropertyFlags::HOST_COHERENT,
        )?;
        let allocate_info = vk::MemoryAllocateInfo::builder()
            .allocation_size(memory_requirements.size)
            .memory_type_index(memory_type_index);

        unsafe {
            staging.memory = staging
                .device
                .allocate_memory(&allocate_info, None)
                .map_err(VulkanError::Api)?;
            staging
                .device
                .bind_buffer_memory(buffer, staging.memory, 0)
                .map_err(VulkanError::Api)?;

            let data_ptr = staging
                .device
                .map_memory(staging.memory, 0, buffer_size, vk::MemoryMapFlags::empty())
                .map_err(VulkanError::Api)?
                .cast::<u8>();
            std::ptr::copy_nonoverlapping(bytes.as_ptr(), data_ptr, bytes.len());
            staging.device.unmap_memory(staging.memory);
        }

        Ok(staging)
    }
}

impl Drop for StagingBuffer {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_buffer(self.buffer, None);
            if self.memory != vk::DeviceMemory::null() {
                self.device.free_memory(self.memory, None);
            }
        }
    }
}
