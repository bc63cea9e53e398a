//! Scene graph and the composer that owns the two galaxies.

use crate::galaxy::{generate_galaxy, GalaxyParameters, GalaxyPointCloud};
use crate::label::Label;
use crate::math::{add, euler_rotation, multiply_matrix_vector, sub, transpose};
use crate::random::UniformSource;
use std::f32::consts::FRAC_PI_4;

/// Horizontal distance of each galaxy from the world origin
pub const GALAXY_OFFSET: f32 = 20.0;

/// Tilt applied to the second galaxy on every axis
pub const COMPANION_TILT: [f32; 3] = [FRAC_PI_4, FRAC_PI_4, FRAC_PI_4];

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Transform {
    pub position: [f32; 3],
    /// Euler angles in radians, XYZ order
    pub rotation: [f32; 3],
}

impl Transform {
    /// Maps a point from local space into world space
    pub fn to_world(&self, local: &[f32; 3]) -> [f32; 3] {
        add(&multiply_matrix_vector(&euler_rotation(&self.rotation), local), &self.position)
    }

    /// Maps a world-space point into local space
    pub fn to_local(&self, world: &[f32; 3]) -> [f32; 3] {
        let inverse = transpose(&euler_rotation(&self.rotation));
        multiply_matrix_vector(&inverse, &sub(world, &self.position))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Blending {
    Normal,
    Additive,
}

/// How a point cloud is drawn
#[derive(Clone, Debug, PartialEq)]
pub struct PointsMaterial {
    pub size: f32,
    pub size_attenuation: bool,
    pub depth_write: bool,
    pub blending: Blending,
    pub vertex_colors: bool,
    pub disposed: bool,
}

impl PointsMaterial {
    pub fn new(size: f32) -> Self {
        PointsMaterial {
            size,
            size_attenuation: true,
            depth_write: false,
            blending: Blending::Additive,
            vertex_colors: true,
            disposed: false,
        }
    }

    pub fn dispose(&mut self) {
        self.disposed = true;
    }
}

/// Point buffers plus their upload state
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointsGeometry {
    pub cloud: GalaxyPointCloud,
    /// Set when the position buffer changed since the last draw
    pub needs_update: bool,
    pub disposed: bool,
}

impl PointsGeometry {
    pub fn new(cloud: GalaxyPointCloud) -> Self {
        PointsGeometry {
            cloud,
            needs_update: true,
            disposed: false,
        }
    }

    /// Releases the buffers
    pub fn dispose(&mut self) {
        self.cloud = GalaxyPointCloud::default();
        self.needs_update = false;
        self.disposed = true;
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Points {
    pub geometry: PointsGeometry,
    pub material: PointsMaterial,
    pub transform: Transform,
    /// World-space center used for the collision distance
    pub anchor: [f32; 3],
}

impl Points {
    /// Moves the cloud and its anchor by `offset` in world space
    ///
    /// The shift is written into the position buffer so the transform keeps
    /// pivoting about the world origin.
    pub fn translate(&mut self, offset: &[f32; 3]) {
        let inverse = transpose(&euler_rotation(&self.transform.rotation));
        let local = multiply_matrix_vector(&inverse, offset);
        for p in self.geometry.cloud.positions.chunks_exact_mut(3) {
            p[0] += local[0];
            p[1] += local[1];
            p[2] += local[2];
        }
        self.anchor = add(&self.anchor, offset);
        self.geometry.needs_update = true;
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Points(Points),
    Label(Label),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(u64);

/// Flat list of drawable nodes
#[derive(Debug, Default)]
pub struct Scene {
    nodes: Vec<(NodeId, Node)>,
    next_id: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.push((id, node));
        id
    }

    /// Detaches a node and hands it back to the caller
    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        let index = self.nodes.iter().position(|(node_id, _)| *node_id == id)?;
        Some(self.nodes.remove(index).1)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().map(|(_, node)| node)
    }

    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.nodes.iter_mut().map(|(_, node)| node)
    }

    pub fn points(&self, id: NodeId) -> Option<&Points> {
        match self.nodes.iter().find(|(node_id, _)| *node_id == id) {
            Some((_, Node::Points(points))) => Some(points),
            _ => None,
        }
    }

    pub fn points_mut(&mut self, id: NodeId) -> Option<&mut Points> {
        match self.nodes.iter_mut().find(|(node_id, _)| *node_id == id) {
            Some((_, Node::Points(points))) => Some(points),
            _ => None,
        }
    }

    /// Borrows two distinct point nodes mutably at once
    pub fn points_pair_mut(&mut self, a: NodeId, b: NodeId) -> Option<(&mut Points, &mut Points)> {
        if a == b {
            return None;
        }
        let mut first = None;
        let mut second = None;
        for (id, node) in self.nodes.iter_mut() {
            if let Node::Points(points) = node {
                if *id == a {
                    first = Some(points);
                } else if *id == b {
                    second = Some(points);
                }
            }
        }
        Some((first?, second?))
    }

    pub fn points_count(&self) -> usize {
        self.nodes()
            .filter(|node| matches!(node, Node::Points(_)))
            .count()
    }
}

/// Owns the two galaxy nodes and rebuilds them on demand
#[derive(Debug)]
pub struct SceneComposer {
    pub primary: GalaxyParameters,
    pub companion: GalaxyParameters,
    galaxies: Option<(NodeId, NodeId)>,
}

impl SceneComposer {
    pub fn new(primary: GalaxyParameters, companion: GalaxyParameters) -> Self {
        SceneComposer {
            primary,
            companion,
            galaxies: None,
        }
    }

    /// Node ids of the left and right galaxy, once created
    pub fn galaxies(&self) -> Option<(NodeId, NodeId)> {
        self.galaxies
    }

    /// Builds both galaxies, releasing any previous generation first
    pub fn create_galaxies(&mut self, scene: &mut Scene, rng: &mut impl UniformSource) {
        if let Some((left, right)) = self.galaxies.take() {
            for id in [left, right] {
                if let Some(Node::Points(mut points)) = scene.remove(id) {
                    points.geometry.dispose();
                    points.material.dispose();
                }
            }
            tracing::debug!(target: "scene", "released previous galaxies");
        }

        let left = Points {
            geometry: PointsGeometry::new(generate_galaxy(&self.primary, -GALAXY_OFFSET, rng)),
            material: PointsMaterial::new(self.primary.size),
            transform: Transform::default(),
            anchor: [-GALAXY_OFFSET, 0.0, 0.0],
        };
        let right = Points {
            geometry: PointsGeometry::new(generate_galaxy(&self.companion, GALAXY_OFFSET, rng)),
            material: PointsMaterial::new(self.companion.size),
            transform: Transform {
                rotation: COMPANION_TILT,
                ..Transform::default()
            },
            anchor: [GALAXY_OFFSET, 0.0, 0.0],
        };

        let left = scene.add(Node::Points(left));
        let right = scene.add(Node::Points(right));
        self.galaxies = Some((left, right));

        tracing::info!(
            target: "scene",
            left = self.primary.count,
            right = self.companion.count,
            "galaxies created"
        );
    }
}
