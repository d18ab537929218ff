//! Device compute backend
//!
//! Matrices live in wgpu storage buffers; matmul and elementwise add are
//! compute dispatches, and `into_host` copies the result through a MAP_READ
//! staging buffer back into a host [`Matrix`].

use std::sync::Arc;

use wgpu::util::DeviceExt;

use crate::backend::ComputeBackend;
use crate::error::{BenchError, BenchResult};
use crate::matrix::Matrix;

/// Workgroup edge length; must match the shader's @workgroup_size
const WORKGROUP_SIZE: u32 = 16;

/// Uniform block passed to both kernels
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct MatrixParams {
    n: u32,
}

/// A square matrix resident in device memory
pub struct GpuMatrix {
    buffer: wgpu::Buffer,
    size: usize,
}

impl GpuMatrix {
    pub fn size(&self) -> usize {
        self.size
    }

    fn byte_size(size: usize) -> u64 {
        (size * size * std::mem::size_of::<f32>()) as u64
    }
}

/// GPU-resident backend
pub struct GpuBackend {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    matmul_pipeline: wgpu::ComputePipeline,
    add_pipeline: wgpu::ComputePipeline,
    bind_group_layout: wgpu::BindGroupLayout,
}

impl GpuBackend {
    /// Request an adapter and device and build the compute pipelines.
    ///
    /// Fails with [`BenchError::BackendUnavailable`] when no compatible
    /// adapter exists, so callers can distinguish "no GPU" from a real fault.
    pub fn new() -> BenchResult<Self> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None,
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| BenchError::BackendUnavailable {
            backend: "wgpu".to_string(),
        })?;

        let info = adapter.get_info();
        log::info!("GPU adapter: {} ({:?})", info.name, info.backend);

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Matrix Bench Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
            },
            None,
        ))
        .map_err(|e| BenchError::GpuInit {
            message: e.to_string(),
        })?;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Matrix Compute Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/matmul.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Matrix Bind Group Layout"),
            entries: &[
                // Dimension uniform
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // Left operand
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // Right operand
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // Result
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: false },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Matrix Compute Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let matmul_pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("Matmul Pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: "matmul",
        });

        let add_pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("Add Pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: "add",
        });

        Ok(Self {
            device: Arc::new(device),
            queue: Arc::new(queue),
            matmul_pipeline,
            add_pipeline,
            bind_group_layout,
        })
    }

    /// Dispatch one binary kernel over an n x n output
    fn dispatch(
        &self,
        pipeline: &wgpu::ComputePipeline,
        label: &str,
        lhs: &GpuMatrix,
        rhs: &GpuMatrix,
    ) -> BenchResult<GpuMatrix> {
        if lhs.size != rhs.size {
            return Err(BenchError::ShapeMismatch {
                left_rows: lhs.size,
                left_cols: lhs.size,
                right_rows: rhs.size,
                right_cols: rhs.size,
            });
        }
        let n = lhs.size;

        let params = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Matrix Params"),
                contents: bytemuck::bytes_of(&MatrixParams { n: n as u32 }),
                usage: wgpu::BufferUsages::UNIFORM,
            });

        let output = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Matrix Output Buffer"),
            size: GpuMatrix::byte_size(n),
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Matrix Bind Group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: params.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: lhs.buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: rhs.buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: output.as_entire_binding(),
                },
            ],
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Matrix Compute Encoder"),
            });
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some(label),
                timestamp_writes: None,
            });
            pass.set_pipeline(pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            let groups = (n as u32 + WORKGROUP_SIZE - 1) / WORKGROUP_SIZE;
            pass.dispatch_workgroups(groups, groups, 1);
        }
        self.queue.submit(std::iter::once(encoder.finish()));

        Ok(GpuMatrix {
            buffer: output,
            size: n,
        })
    }
}

impl ComputeBackend for GpuBackend {
    type Matrix = GpuMatrix;

    fn name(&self) -> &'static str {
        "GPU"
    }

    fn upload(&self, matrix: &Matrix) -> BenchResult<GpuMatrix> {
        if matrix.rows() != matrix.cols() {
            return Err(BenchError::ShapeMismatch {
                left_rows: matrix.rows(),
                left_cols: matrix.cols(),
                right_rows: matrix.cols(),
                right_cols: matrix.rows(),
            });
        }
        let buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Matrix Input Buffer"),
                contents: bytemuck::cast_slice(matrix.as_slice()),
                usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            });
        Ok(GpuMatrix {
            buffer,
            size: matrix.rows(),
        })
    }

    fn matmul(&self, lhs: &GpuMatrix, rhs: &GpuMatrix) -> BenchResult<GpuMatrix> {
        self.dispatch(&self.matmul_pipeline, "Matmul Pass", lhs, rhs)
    }

    fn add(&self, lhs: &GpuMatrix, rhs: &GpuMatrix) -> BenchResult<GpuMatrix> {
        self.dispatch(&self.add_pipeline, "Add Pass", lhs, rhs)
    }

    fn into_host(&self, matrix: GpuMatrix) -> BenchResult<Matrix> {
        let byte_size = GpuMatrix::byte_size(matrix.size);
        let download = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Matrix Download Buffer"),
            size: byte_size,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Matrix Readback Encoder"),
            });
        encoder.copy_buffer_to_buffer(&matrix.buffer, 0, &download, 0, byte_size);
        self.queue.submit(std::iter::once(encoder.finish()));

        let slice = download.slice(..);
        let (tx, rx) = futures::channel::oneshot::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            if tx.send(result).is_err() {
                log::error!("map_async receiver dropped before readback completed");
            }
        });
        self.device.poll(wgpu::Maintain::Wait);

        pollster::block_on(rx)
            .map_err(|_| BenchError::BufferMap {
                message: "readback channel cancelled".to_string(),
            })?
            .map_err(|e| BenchError::BufferMap {
                message: e.to_string(),
            })?;

        let data = {
            let view = slice.get_mapped_range();
            bytemuck::cast_slice::<u8, f32>(&view).to_vec()
        };
        download.unmap();

        Matrix::from_vec(matrix.size, matrix.size, data)
    }
}
