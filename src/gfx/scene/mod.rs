pub mod light;
pub mod material;
pub mod node;
pub mod scene;
pub mod vertex;

pub use light::{AmbientLight, PointLight};
pub use material::{rgb, Material, MaterialManager};
pub use node::{GeometryId, Node, NodeId, Transform};
pub use scene::{ResolvedLight, Scene};
pub use vertex::Vertex3D;
