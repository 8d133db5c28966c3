//! Renderable point geometry.
//!
//! [`PointGeometry`] is the output of an import: one position, one color and
//! one index per point, rendered with point topology. It is GPU-agnostic;
//! [`PointGeometry::to_vertices`] and [`PointGeometry::index_bytes`] produce
//! upload-ready data.

use pts_math::{apply, Bounds, Mat4, Vec3};

use crate::color::normalize_rgb;
use crate::error::{ImportError, ImportResult};
use crate::record::RecordSlice;

/// Largest point count addressable with 16-bit indices.
pub const NARROW_INDEX_LIMIT: usize = u16::MAX as usize;

/// Bit width of the index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexWidth {
    /// 16-bit indices
    Narrow,
    /// 32-bit indices
    Wide,
}

impl IndexWidth {
    /// Pick the index width for `count` points.
    pub fn for_count(count: usize) -> Self {
        if count > NARROW_INDEX_LIMIT {
            IndexWidth::Wide
        } else {
            IndexWidth::Narrow
        }
    }

    /// Size of one index in bytes.
    pub fn byte_size(self) -> usize {
        match self {
            IndexWidth::Narrow => 2,
            IndexWidth::Wide => 4,
        }
    }
}

/// Point indices, stored at the width chosen during assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexBuffer {
    U16(Vec<u16>),
    U32(Vec<u32>),
}

impl Default for IndexBuffer {
    fn default() -> Self {
        IndexBuffer::U16(Vec::new())
    }
}

impl IndexBuffer {
    /// Build the identity index sequence `0..count`.
    ///
    /// Fails with [`ImportError::RecordOverflow`] if `count` does not fit
    /// in 32-bit indices.
    pub fn identity(count: usize) -> ImportResult<Self> {
        match IndexWidth::for_count(count) {
            IndexWidth::Narrow => {
                let end = u16::try_from(count).map_err(|_| ImportError::RecordOverflow { count })?;
                Ok(IndexBuffer::U16((0..end).collect()))
            }
            IndexWidth::Wide => {
                let end = u32::try_from(count).map_err(|_| ImportError::RecordOverflow { count })?;
                Ok(IndexBuffer::U32((0..end).collect()))
            }
        }
    }

    pub fn width(&self) -> IndexWidth {
        match self {
            IndexBuffer::U16(_) => IndexWidth::Narrow,
            IndexBuffer::U32(_) => IndexWidth::Wide,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            IndexBuffer::U16(indices) => indices.len(),
            IndexBuffer::U32(indices) => indices.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index `i` widened to `u32`.
    pub fn get(&self, i: usize) -> Option<u32> {
        match self {
            IndexBuffer::U16(indices) => indices.get(i).map(|&index| u32::from(index)),
            IndexBuffer::U32(indices) => indices.get(i).copied(),
        }
    }

    /// Iterate over all indices widened to `u32`.
    pub fn iter(&self) -> Box<dyn Iterator<Item = u32> + '_> {
        match self {
            IndexBuffer::U16(indices) => Box::new(indices.iter().map(|&index| u32::from(index))),
            IndexBuffer::U32(indices) => Box::new(indices.iter().copied()),
        }
    }

    /// Raw index bytes in native endianness, ready for an index buffer upload.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            IndexBuffer::U16(indices) => bytemuck::cast_slice(indices),
            IndexBuffer::U32(indices) => bytemuck::cast_slice(indices),
        }
    }
}

/// Interleaved GPU vertex for point rendering.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

/// An imported point cloud ready to hand to a renderer.
#[derive(Clone, Debug, Default)]
pub struct PointGeometry {
    /// Mesh name (usually the source file stem)
    pub name: String,

    /// Transformed point positions
    pub positions: Vec<Vec3>,

    /// Normalized RGB colors, `colors[i]` belongs to `positions[i]`
    pub colors: Vec<Vec3>,

    /// Point indices, always `0..len`
    pub indices: IndexBuffer,

    /// Bounds of the transformed positions
    pub bounds: Bounds,
}

impl PointGeometry {
    /// A valid geometry with no points.
    pub fn empty() -> Self {
        Self {
            bounds: Bounds::empty(),
            ..Default::default()
        }
    }

    /// Set the mesh name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn index_width(&self) -> IndexWidth {
        self.indices.width()
    }

    /// Index data as bytes for upload.
    pub fn index_bytes(&self) -> &[u8] {
        self.indices.as_bytes()
    }

    /// Interleave positions and colors into GPU vertices.
    pub fn to_vertices(&self) -> Vec<PointVertex> {
        self.positions
            .iter()
            .zip(&self.colors)
            .map(|(position, color)| PointVertex {
                position: position.to_array(),
                color: color.to_array(),
            })
            .collect()
    }
}

/// Assemble a point geometry from packed records.
///
/// Record `i` becomes point `i`: its position is transformed by `transform`
/// and its color normalized. Zero records yield an empty geometry rather
/// than an error.
pub fn assemble(records: &RecordSlice<'_>, transform: &Mat4) -> ImportResult<PointGeometry> {
    let count = records.len();
    if count == 0 {
        log::debug!("No records to assemble, returning empty geometry");
        return Ok(PointGeometry::empty());
    }

    // Reject unaddressable counts before touching any record
    let indices = IndexBuffer::identity(count)?;

    let mut positions = Vec::with_capacity(count);
    let mut colors = Vec::with_capacity(count);
    let mut bounds = Bounds::empty();

    for i in 0..count {
        let record = records.decode(i)?;
        let position = apply(transform, record.position);
        bounds.extend(position);
        positions.push(position);
        colors.push(normalize_rgb(record.color));
    }

    log::debug!(
        "Assembled {} points with {:?} indices",
        count,
        indices.width()
    );

    Ok(PointGeometry {
        name: String::new(),
        positions,
        colors,
        indices,
        bounds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{encode_records, RawPointRecord};

    fn rgb_records() -> Vec<RawPointRecord> {
        vec![
            RawPointRecord::new(Vec3::new(0.0, 0.0, 0.0), 5, [255, 0, 0]),
            RawPointRecord::new(Vec3::new(1.0, 1.0, 1.0), 5, [0, 255, 0]),
            RawPointRecord::new(Vec3::new(2.0, 2.0, 2.0), 5, [0, 0, 255]),
        ]
    }

    fn grid_records(count: usize) -> Vec<RawPointRecord> {
        (0..count)
            .map(|i| {
                RawPointRecord::new(
                    Vec3::new(i as f32, 0.0, -(i as f32)),
                    i as i32,
                    [(i % 256) as u8, 0, 0],
                )
            })
            .collect()
    }

    #[test]
    fn test_assemble_identity() {
        let bytes = encode_records(&rgb_records());
        let records = RecordSlice::new(&bytes, 3).unwrap();
        let geometry = assemble(&records, &Mat4::IDENTITY).unwrap();

        assert_eq!(
            geometry.positions,
            vec![Vec3::ZERO, Vec3::ONE, Vec3::splat(2.0)]
        );
        assert_eq!(geometry.colors, vec![Vec3::X, Vec3::Y, Vec3::Z]);
        assert_eq!(geometry.indices, IndexBuffer::U16(vec![0, 1, 2]));
        assert_eq!(geometry.index_width(), IndexWidth::Narrow);
    }

    #[test]
    fn test_assemble_translated() {
        let bytes = encode_records(&rgb_records());
        let records = RecordSlice::new(&bytes, 3).unwrap();
        let transform = Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0));
        let geometry = assemble(&records, &transform).unwrap();

        assert_eq!(
            geometry.positions,
            vec![
                Vec3::new(10.0, 0.0, 0.0),
                Vec3::new(11.0, 1.0, 1.0),
                Vec3::new(12.0, 2.0, 2.0)
            ]
        );
        assert_eq!(geometry.colors, vec![Vec3::X, Vec3::Y, Vec3::Z]);
        assert_eq!(geometry.bounds.min, Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(geometry.bounds.max, Vec3::new(12.0, 2.0, 2.0));
    }

    #[test]
    fn test_assemble_white_is_one() {
        let bytes = encode_records(&[RawPointRecord::new(Vec3::new(3.0, 4.0, 5.0), 0, [255; 3])]);
        let records = RecordSlice::new(&bytes, 1).unwrap();
        let geometry = assemble(&records, &Mat4::IDENTITY).unwrap();

        assert_eq!(geometry.positions[0], Vec3::new(3.0, 4.0, 5.0));
        assert_eq!(geometry.colors[0], Vec3::ONE);
    }

    #[test]
    fn test_assemble_empty() {
        let geometry = assemble(&RecordSlice::empty(), &Mat4::IDENTITY).unwrap();
        assert!(geometry.is_empty());
        assert!(geometry.colors.is_empty());
        assert!(geometry.indices.is_empty());
        assert!(geometry.bounds.is_empty());
        assert_eq!(geometry.index_width(), IndexWidth::Narrow);
    }

    #[test]
    fn test_assemble_matches_per_record_pipeline() {
        let source = grid_records(300);
        let bytes = encode_records(&source);
        let records = RecordSlice::new(&bytes, source.len()).unwrap();
        let transform = pts_math::trs(
            Vec3::new(1.0, -2.0, 3.0),
            Vec3::new(15.0, 30.0, 45.0),
            Vec3::new(2.0, 0.5, 1.0),
        );
        let geometry = assemble(&records, &transform).unwrap();

        assert_eq!(geometry.len(), source.len());
        assert_eq!(geometry.colors.len(), source.len());
        for (i, record) in source.iter().enumerate() {
            assert_eq!(geometry.positions[i], apply(&transform, record.position));
            assert_eq!(geometry.colors[i], normalize_rgb(record.color));
            assert_eq!(geometry.indices.get(i), Some(i as u32));
        }
    }

    #[test]
    fn test_index_width_boundary() {
        assert_eq!(IndexWidth::for_count(0), IndexWidth::Narrow);
        assert_eq!(IndexWidth::for_count(65535), IndexWidth::Narrow);
        assert_eq!(IndexWidth::for_count(65536), IndexWidth::Wide);
    }

    #[test]
    fn test_assemble_at_narrow_limit() {
        let bytes = encode_records(&grid_records(65535));
        let records = RecordSlice::new(&bytes, 65535).unwrap();
        let geometry = assemble(&records, &Mat4::IDENTITY).unwrap();

        assert_eq!(geometry.index_width(), IndexWidth::Narrow);
        assert_eq!(geometry.indices.len(), 65535);
        assert_eq!(geometry.indices.get(65534), Some(65534));
        assert!(geometry.indices.iter().eq(0..65535u32));
    }

    #[test]
    fn test_assemble_past_narrow_limit() {
        let bytes = encode_records(&grid_records(65536));
        let records = RecordSlice::new(&bytes, 65536).unwrap();
        let geometry = assemble(&records, &Mat4::IDENTITY).unwrap();

        assert_eq!(geometry.index_width(), IndexWidth::Wide);
        assert_eq!(geometry.indices.len(), 65536);
        assert_eq!(geometry.indices.get(65535), Some(65535));
        assert!(geometry.indices.iter().eq(0..65536u32));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_identity_indices_overflow() {
        let count = u32::MAX as usize + 1;
        assert_eq!(
            IndexBuffer::identity(count),
            Err(ImportError::RecordOverflow { count })
        );
    }

    #[test]
    fn test_vertices_and_index_bytes() {
        let bytes = encode_records(&rgb_records());
        let records = RecordSlice::new(&bytes, 3).unwrap();
        let geometry = assemble(&records, &Mat4::IDENTITY).unwrap();

        let vertices = geometry.to_vertices();
        assert_eq!(vertices.len(), 3);
        assert_eq!(vertices[1].position, [1.0, 1.0, 1.0]);
        assert_eq!(vertices[2].color, [0.0, 0.0, 1.0]);
        assert_eq!(
            bytemuck::cast_slice::<PointVertex, u8>(&vertices).len(),
            3 * 6 * 4
        );

        assert_eq!(geometry.index_bytes().len(), 3 * IndexWidth::Narrow.byte_size());
    }
}
