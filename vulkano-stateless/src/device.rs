// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! The per-device validation context.

use crate::{
    chain::{self, ChainRules, DEFAULT_MAX_CHAIN_LENGTH},
    instance::PhysicalDeviceQueries,
    sink::{TracingSink, ViolationSink},
    DeviceCapabilities, NonExhaustive, Violations,
};
use ash::vk;
use foldhash::HashMap;
use parking_lot::{Mutex, RwLock};
use smallvec::SmallVec;
use std::{ffi::c_void, fmt, sync::Arc};

/// Parameters to create a new `StatelessValidator` or `InstanceValidator`.
#[derive(Clone, Debug)]
pub struct StatelessValidatorCreateInfo {
    /// The maximum number of structures that are walked in one `p_next` chain. Longer chains are
    /// reported as a violation.
    ///
    /// The default value is `256`.
    pub max_chain_length: usize,

    /// Where violations are reported.
    ///
    /// The default value is [`TracingSink`].
    pub sink: Arc<dyn ViolationSink>,

    pub _ne: NonExhaustive,
}

impl Default for StatelessValidatorCreateInfo {
    #[inline]
    fn default() -> Self {
        Self {
            max_chain_length: DEFAULT_MAX_CHAIN_LENGTH,
            sink: Arc::new(TracingSink),
            _ne: NonExhaustive(()),
        }
    }
}

/// How one subpass of a render pass uses attachments.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SubpassUsage {
    /// At least one color attachment reference is not `VK_ATTACHMENT_UNUSED`.
    pub uses_color_attachment: bool,

    /// The depth/stencil attachment reference is present and not `VK_ATTACHMENT_UNUSED`.
    pub uses_depth_stencil_attachment: bool,

    pub color_attachment_count: u32,
    pub flags: vk::SubpassDescriptionFlags,
}

/// The attachment usage of every subpass of a render pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderPassUsage {
    pub subpasses: SmallVec<[SubpassUsage; 4]>,
}

/// Validates the arguments of device-level entry points.
///
/// One validator is created for each logical device, after `vkCreateDevice` succeeds. The
/// capability snapshot never changes afterwards; the only mutable state is the attachment usage
/// of each live render pass, and the pool of each live secondary command buffer.
pub struct StatelessValidator {
    device: vk::Device,
    physical_device: vk::PhysicalDevice,
    capabilities: DeviceCapabilities,
    queries: Option<Arc<dyn PhysicalDeviceQueries>>,
    max_chain_length: usize,
    sink: Arc<dyn ViolationSink>,

    render_passes: Mutex<HashMap<vk::RenderPass, RenderPassUsage>>,
    secondary_command_buffers: RwLock<HashMap<vk::CommandBuffer, vk::CommandPool>>,
}

impl StatelessValidator {
    /// Creates a new `StatelessValidator` for `device`.
    ///
    /// `queries` is used to look up format properties. If it is `None`, rules that need them are
    /// skipped.
    pub fn new(
        device: vk::Device,
        physical_device: vk::PhysicalDevice,
        capabilities: DeviceCapabilities,
        queries: Option<Arc<dyn PhysicalDeviceQueries>>,
        create_info: StatelessValidatorCreateInfo,
    ) -> Self {
        let StatelessValidatorCreateInfo {
            max_chain_length,
            sink,
            _ne: _,
        } = create_info;

        StatelessValidator {
            device,
            physical_device,
            capabilities,
            queries,
            max_chain_length,
            sink,
            render_passes: Mutex::new(HashMap::default()),
            secondary_command_buffers: RwLock::new(HashMap::default()),
        }
    }

    /// Returns the device that this validator belongs to.
    #[inline]
    pub fn device(&self) -> vk::Device {
        self.device
    }

    /// Returns the physical device that the device was created from.
    #[inline]
    pub fn physical_device(&self) -> vk::PhysicalDevice {
        self.physical_device
    }

    /// Returns the capability snapshot that the rules read.
    #[inline]
    pub fn capabilities(&self) -> &DeviceCapabilities {
        &self.capabilities
    }

    /// Returns the recorded attachment usage of a render pass.
    pub fn render_pass_usage(&self, render_pass: vk::RenderPass) -> Option<RenderPassUsage> {
        self.render_passes.lock().get(&render_pass).cloned()
    }

    /// Returns the recorded attachment usage of one subpass of a render pass.
    pub(crate) fn subpass_usage(
        &self,
        render_pass: vk::RenderPass,
        subpass: u32,
    ) -> Option<SubpassUsage> {
        self.render_passes
            .lock()
            .get(&render_pass)
            .and_then(|usage| usage.subpasses.get(subpass as usize).copied())
    }

    pub(crate) fn insert_render_pass(&self, render_pass: vk::RenderPass, usage: RenderPassUsage) {
        self.render_passes.lock().insert(render_pass, usage);
    }

    pub(crate) fn remove_render_pass(&self, render_pass: vk::RenderPass) -> bool {
        self.render_passes.lock().remove(&render_pass).is_some()
    }

    /// Returns the pool that a secondary command buffer was allocated from, or `None` if the
    /// command buffer is not a known secondary command buffer.
    pub fn secondary_command_buffer_pool(
        &self,
        command_buffer: vk::CommandBuffer,
    ) -> Option<vk::CommandPool> {
        self.secondary_command_buffers
            .read()
            .get(&command_buffer)
            .copied()
    }

    pub(crate) fn insert_secondary_command_buffers(
        &self,
        pool: vk::CommandPool,
        command_buffers: &[vk::CommandBuffer],
    ) {
        let mut map = self.secondary_command_buffers.write();

        for &command_buffer in command_buffers {
            map.insert(command_buffer, pool);
        }
    }

    pub(crate) fn remove_secondary_command_buffers(
        &self,
        command_buffers: &[vk::CommandBuffer],
    ) -> usize {
        let mut map = self.secondary_command_buffers.write();

        command_buffers
            .iter()
            .filter(|command_buffer| map.remove(command_buffer).is_some())
            .count()
    }

    pub(crate) fn remove_secondary_command_buffers_of_pool(&self, pool: vk::CommandPool) -> usize {
        let mut map = self.secondary_command_buffers.write();
        let len = map.len();
        map.retain(|_, &mut owner| owner != pool);

        len - map.len()
    }

    /// Queries the format properties of the physical device, if a query object was provided.
    pub(crate) fn format_properties(&self, format: vk::Format) -> Option<vk::FormatProperties> {
        self.queries
            .as_ref()
            .map(|queries| queries.format_properties(self.physical_device, format))
    }

    /// Validates the `p_next` chain of a structure against the device capabilities.
    pub(crate) unsafe fn validate_chain(
        &self,
        context: &'static str,
        p_next: *const c_void,
        rules: &ChainRules,
    ) -> Violations {
        chain::validate_chain(
            &self.capabilities,
            context,
            p_next,
            rules,
            self.max_chain_length,
        )
    }

    /// Reports every violation to the sink, and returns whether there were any.
    pub(crate) fn report(&self, api: &'static str, violations: Violations) -> bool {
        for error in violations.iter() {
            self.sink.report(api, error);
        }

        !violations.is_empty()
    }
}

impl fmt::Debug for StatelessValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatelessValidator")
            .field("device", &self.device)
            .field("physical_device", &self.physical_device)
            .field("capabilities", &self.capabilities)
            .field("max_chain_length", &self.max_chain_length)
            .field("sink", &self.sink)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::test_validator;
    use ash::vk::Handle;

    #[test]
    fn secondary_command_buffer_map() {
        let validator = test_validator();
        let pool_a = vk::CommandPool::from_raw(1);
        let pool_b = vk::CommandPool::from_raw(2);
        let buffers_a = [
            vk::CommandBuffer::from_raw(10),
            vk::CommandBuffer::from_raw(11),
        ];
        let buffers_b = [vk::CommandBuffer::from_raw(20)];

        validator.insert_secondary_command_buffers(pool_a, &buffers_a);
        validator.insert_secondary_command_buffers(pool_b, &buffers_b);
        assert_eq!(
            validator.secondary_command_buffer_pool(buffers_a[1]),
            Some(pool_a),
        );

        assert_eq!(validator.remove_secondary_command_buffers(&buffers_a[..1]), 1);
        assert_eq!(validator.secondary_command_buffer_pool(buffers_a[0]), None);

        assert_eq!(validator.remove_secondary_command_buffers_of_pool(pool_a), 1);
        assert_eq!(
            validator.secondary_command_buffer_pool(buffers_b[0]),
            Some(pool_b),
        );
    }

    #[test]
    fn render_pass_map() {
        let validator = test_validator();
        let render_pass = vk::RenderPass::from_raw(5);
        let usage = RenderPassUsage {
            subpasses: [SubpassUsage {
                uses_color_attachment: true,
                color_attachment_count: 1,
                ..Default::default()
            }]
            .into_iter()
            .collect(),
        };

        validator.insert_render_pass(render_pass, usage.clone());
        assert_eq!(validator.render_pass_usage(render_pass), Some(usage));
        assert!(validator.subpass_usage(render_pass, 0).is_some());
        assert!(validator.subpass_usage(render_pass, 1).is_none());

        assert!(validator.remove_render_pass(render_pass));
        assert!(validator.render_pass_usage(render_pass).is_none());
    }
}
