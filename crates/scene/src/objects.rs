use glam::Vec3;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};
use sweetcart_common::ObjectTransform;

/// One entry per distinct drawable mesh. The two cart tires share a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshId {
    Tabletop,
    Frosting,
    Cake,
    Donut,
    IceCreamBar,
    IceCreamStick,
    Cart,
    CartTire,
    CandyBall,
    CartTop,
}

impl MeshId {
    pub const ALL: [MeshId; 10] = [
        MeshId::Tabletop,
        MeshId::Frosting,
        MeshId::Cake,
        MeshId::Donut,
        MeshId::IceCreamBar,
        MeshId::IceCreamStick,
        MeshId::Cart,
        MeshId::CartTire,
        MeshId::CandyBall,
        MeshId::CartTop,
    ];

    /// Position of this mesh in [`MeshId::ALL`].
    pub const fn index(self) -> usize {
        match self {
            MeshId::Tabletop => 0,
            MeshId::Frosting => 1,
            MeshId::Cake => 2,
            MeshId::Donut => 3,
            MeshId::IceCreamBar => 4,
            MeshId::IceCreamStick => 5,
            MeshId::Cart => 6,
            MeshId::CartTire => 7,
            MeshId::CandyBall => 8,
            MeshId::CartTop => 9,
        }
    }

    /// Construction parameters for this mesh.
    pub const fn primitive(self) -> Primitive {
        match self {
            MeshId::Tabletop => Primitive::Plane,
            MeshId::Frosting => Primitive::Cone {
                radius: 1.25,
                segments: 50,
                height: 1.25,
            },
            MeshId::Cake => Primitive::Cylinder {
                radius: 1.25,
                segments: 50,
                height: 1.25,
            },
            MeshId::Donut => Primitive::Torus {
                ring_segments: 50,
                tube_segments: 50,
                ring_radius: 1.0,
                tube_radius: 0.5,
            },
            MeshId::IceCreamBar | MeshId::IceCreamStick | MeshId::Cart => Primitive::Cube,
            MeshId::CartTire => Primitive::Cylinder {
                radius: 2.0,
                segments: 50,
                height: 0.5,
            },
            MeshId::CandyBall => Primitive::Sphere {
                radius: 1.25,
                slices: 25,
                stacks: 25,
            },
            MeshId::CartTop => Primitive::Cylinder {
                radius: 1.0,
                segments: 50,
                height: 1.0,
            },
        }
    }
}

/// Geometry parameters handed to the primitive mesh builders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    /// Authored 2x2 unit quad on the XZ plane, six explicit vertices.
    Plane,
    /// Unit cube centered at the origin.
    Cube,
    /// Capped cone, centered vertically, apex up.
    Cone { radius: f32, segments: u32, height: f32 },
    /// Capped cylinder, centered vertically.
    Cylinder { radius: f32, segments: u32, height: f32 },
    /// Torus in the XY plane around the Z axis.
    Torus {
        ring_segments: u32,
        tube_segments: u32,
        ring_radius: f32,
        tube_radius: f32,
    },
    /// UV sphere centered at the origin.
    Sphere { radius: f32, slices: u32, stacks: u32 },
}

/// One entry per texture image, with its fixed on-disk path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureId {
    Table,
    CupcakeFrosting,
    CupcakeCake,
    Donut,
    IceCreamBar,
    IceCreamStick,
    CottonCandyCart,
    CottonCandyBall,
    CottonCandyTire,
    CottonCandyTop,
}

impl TextureId {
    pub const ALL: [TextureId; 10] = [
        TextureId::Table,
        TextureId::CupcakeFrosting,
        TextureId::CupcakeCake,
        TextureId::Donut,
        TextureId::IceCreamBar,
        TextureId::IceCreamStick,
        TextureId::CottonCandyCart,
        TextureId::CottonCandyBall,
        TextureId::CottonCandyTire,
        TextureId::CottonCandyTop,
    ];

    /// Position of this texture in [`TextureId::ALL`].
    pub const fn index(self) -> usize {
        match self {
            TextureId::Table => 0,
            TextureId::CupcakeFrosting => 1,
            TextureId::CupcakeCake => 2,
            TextureId::Donut => 3,
            TextureId::IceCreamBar => 4,
            TextureId::IceCreamStick => 5,
            TextureId::CottonCandyCart => 6,
            TextureId::CottonCandyBall => 7,
            TextureId::CottonCandyTire => 8,
            TextureId::CottonCandyTop => 9,
        }
    }

    /// Image file path relative to the assets root.
    pub const fn file_path(self) -> &'static str {
        match self {
            TextureId::Table => "images/table.jpg",
            TextureId::CupcakeFrosting => "images/cupcake_frosting.jpg",
            TextureId::CupcakeCake => "images/cupcake_cake.jpg",
            TextureId::Donut => "images/donut.jpg",
            TextureId::IceCreamBar => "images/ice_cream_bar.jpg",
            TextureId::IceCreamStick => "images/ice_cream_stick.jpg",
            TextureId::CottonCandyCart => "images/cotton_candy_cart.jpg",
            TextureId::CottonCandyBall => "images/cotton_candy_ball.jpg",
            TextureId::CottonCandyTire => "images/cotton_candy_tire.jpg",
            TextureId::CottonCandyTop => "images/cotton_candy_top.jpg",
        }
    }
}

/// Descriptor for one drawn object: mesh, texture, placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneObject {
    pub name: &'static str,
    pub mesh: MeshId,
    pub texture: TextureId,
    pub transform: ObjectTransform,
}

/// The authored tableau, in draw order.
pub const TABLEAU: [SceneObject; 11] = [
    SceneObject {
        name: "table",
        mesh: MeshId::Tabletop,
        texture: TextureId::Table,
        transform: ObjectTransform::new(
            Vec3::new(7.0, 1.0, 7.0),
            0.0,
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(0.0, -1.0, 0.0),
        ),
    },
    SceneObject {
        name: "cupcake frosting",
        mesh: MeshId::Frosting,
        texture: TextureId::CupcakeFrosting,
        transform: ObjectTransform::new(
            Vec3::ONE,
            0.0,
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(0.0, 0.9, 3.5),
        ),
    },
    SceneObject {
        name: "cupcake cake",
        mesh: MeshId::Cake,
        texture: TextureId::CupcakeCake,
        transform: ObjectTransform::new(
            Vec3::ONE,
            0.0,
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(0.0, -0.35, 3.5),
        ),
    },
    SceneObject {
        name: "donut",
        mesh: MeshId::Donut,
        texture: TextureId::Donut,
        transform: ObjectTransform::new(
            Vec3::ONE,
            FRAC_PI_2,
            Vec3::X,
            Vec3::new(0.0, -0.5, -3.5),
        ),
    },
    SceneObject {
        name: "ice cream bar",
        mesh: MeshId::IceCreamBar,
        texture: TextureId::IceCreamBar,
        transform: ObjectTransform::new(
            Vec3::new(2.0, 1.0, 3.0),
            FRAC_PI_4,
            Vec3::Y,
            Vec3::new(3.5, -0.495, 0.0),
        ),
    },
    SceneObject {
        name: "ice cream stick",
        mesh: MeshId::IceCreamStick,
        texture: TextureId::IceCreamStick,
        // A third the size of the ice cream bar, tucked under its corner.
        transform: ObjectTransform::new(
            Vec3::new(2.0 / 3.0, 1.0 / 3.0, 1.0),
            FRAC_PI_4,
            Vec3::Y,
            Vec3::new(4.85, -0.495, 1.35),
        ),
    },
    SceneObject {
        name: "cotton candy cart",
        mesh: MeshId::Cart,
        texture: TextureId::CottonCandyCart,
        transform: ObjectTransform::new(
            Vec3::splat(1.75),
            0.0,
            Vec3::Y,
            Vec3::new(-3.5, -0.12, 0.0),
        ),
    },
    SceneObject {
        name: "cart tire front",
        mesh: MeshId::CartTire,
        texture: TextureId::CottonCandyTire,
        transform: ObjectTransform::new(
            Vec3::splat(0.25),
            FRAC_PI_2,
            Vec3::Z,
            Vec3::new(-2.56, -0.5, 0.75),
        ),
    },
    SceneObject {
        name: "cart tire back",
        mesh: MeshId::CartTire,
        texture: TextureId::CottonCandyTire,
        transform: ObjectTransform::new(
            Vec3::splat(0.25),
            FRAC_PI_2,
            Vec3::Z,
            Vec3::new(-4.44, -0.5, 0.75),
        ),
    },
    SceneObject {
        name: "cotton candy ball",
        mesh: MeshId::CandyBall,
        texture: TextureId::CottonCandyBall,
        transform: ObjectTransform::new(
            Vec3::ONE,
            PI,
            Vec3::Y,
            Vec3::new(-3.5, 1.7, 0.0),
        ),
    },
    SceneObject {
        name: "cart top",
        mesh: MeshId::CartTop,
        texture: TextureId::CottonCandyTop,
        transform: ObjectTransform::new(
            Vec3::splat(0.25),
            0.0,
            Vec3::Z,
            Vec3::new(-3.5, 3.0, 0.0),
        ),
    },
];

/// The one point light, shared by the lighting shader and the marker draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub position: Vec3,
    pub color: Vec3,
    /// Uniform scale of the marker quad drawn at the light position.
    pub marker_scale: f32,
}

/// White light above the center of the table.
pub const LIGHT: Light = Light {
    position: Vec3::new(0.0, 7.0, 0.0),
    color: Vec3::ONE,
    marker_scale: 0.5,
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn tableau_draw_order() {
        assert_eq!(TABLEAU.len(), 11);
        // The table plane draws first; the cart top last.
        assert_eq!(TABLEAU[0].mesh, MeshId::Tabletop);
        assert_eq!(TABLEAU[10].mesh, MeshId::CartTop);
    }

    #[test]
    fn indices_agree_with_all_ordering() {
        for (i, mesh) in MeshId::ALL.iter().enumerate() {
            assert_eq!(mesh.index(), i);
        }
        for (i, texture) in TextureId::ALL.iter().enumerate() {
            assert_eq!(texture.index(), i);
        }
    }

    #[test]
    fn every_mesh_is_drawn() {
        let used: HashSet<MeshId> = TABLEAU.iter().map(|o| o.mesh).collect();
        for mesh in MeshId::ALL {
            assert!(used.contains(&mesh), "{mesh:?} unused");
        }
    }

    #[test]
    fn tires_share_one_mesh() {
        let tires: Vec<_> = TABLEAU
            .iter()
            .filter(|o| o.mesh == MeshId::CartTire)
            .collect();
        assert_eq!(tires.len(), 2);
        assert_eq!(tires[0].texture, tires[1].texture);
        assert_ne!(tires[0].transform.translation, tires[1].transform.translation);
    }

    #[test]
    fn texture_manifest_is_ten_unique_jpegs() {
        let paths: HashSet<&str> = TextureId::ALL.iter().map(|t| t.file_path()).collect();
        assert_eq!(paths.len(), 10);
        for path in paths {
            assert!(path.starts_with("images/"));
            assert!(path.ends_with(".jpg"));
        }
    }

    #[test]
    fn known_point_lands_where_authored() {
        // The ice cream stick sits level with the bar: same Y after the
        // composed transform.
        let bar = &TABLEAU[4];
        let stick = &TABLEAU[5];
        let bar_center = bar.transform.model_matrix().transform_point3(glam::Vec3::ZERO);
        let stick_center = stick
            .transform
            .model_matrix()
            .transform_point3(glam::Vec3::ZERO);
        assert!((bar_center.y - stick_center.y).abs() < 1e-6);
    }

    #[test]
    fn light_sits_above_the_table() {
        assert!(LIGHT.position.y > 0.0);
        assert_eq!(LIGHT.color, glam::Vec3::ONE);
    }
}
