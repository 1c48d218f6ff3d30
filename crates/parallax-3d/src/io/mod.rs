/// PLY point cloud export.
pub mod ply;
