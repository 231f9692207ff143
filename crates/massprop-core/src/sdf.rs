//! SDF output document for the estimated inertials.
//!
//! The document carries one `<model>` per sub-assembly and one `<link>`
//! per part, each holding only an `<inertial>` block: the link pose is the
//! center of mass with zero orientation, followed by the mass and the six
//! independent inertia components. Geometry, joints and visuals are left
//! to the robot model this file is merged into.

use std::collections::BTreeMap;
use std::io::Cursor;
use std::path::Path;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::estimate::LinkInertial;
use crate::inertia::InertiaMatrix;

/// SDF format version written into the root element.
pub const SDF_VERSION: &str = "1.6";

/// Position plus fixed roll/pitch/yaw, serialized as six space-separated
/// values.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Pose {
    pub xyz: [f64; 3],
    pub rpy: [f64; 3],
}

impl Pose {
    /// A pose at `xyz` with zero orientation.
    pub fn from_position(xyz: [f64; 3]) -> Self {
        Self {
            xyz,
            rpy: [0.0; 3],
        }
    }

    fn to_text(self) -> String {
        format!(
            "{} {} {} {} {} {}",
            self.xyz[0], self.xyz[1], self.xyz[2], self.rpy[0], self.rpy[1], self.rpy[2]
        )
    }
}

/// The `<inertial>` block of a link.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Inertial {
    /// Center of mass in the link frame, orientation fixed at zero.
    pub pose: Pose,
    /// Mass in kg.
    pub mass: f64,
    /// Inertia about the center of mass, in kg m^2.
    pub inertia: InertiaMatrix,
}

/// One link entry of a model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    pub name: String,
    pub inertial: Inertial,
}

/// One named model holding its link entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    pub name: String,
    pub links: Vec<Link>,
}

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            links: Vec::new(),
        }
    }

    pub fn add_link(&mut self, link: Link) {
        self.links.push(link);
    }

    /// Build a model from estimated link records, one link per record in
    /// name order.
    pub fn from_link_inertials(
        name: impl Into<String>,
        records: &BTreeMap<String, LinkInertial>,
    ) -> Self {
        let mut model = Model::new(name);
        for (link_name, record) in records {
            model.add_link(Link {
                name: link_name.clone(),
                inertial: Inertial {
                    pose: Pose::from_position(record.center_of_mass.to_array()),
                    mass: record.mass,
                    inertia: InertiaMatrix::from_matrix(&record.inertia),
                },
            });
        }
        model
    }
}

/// A complete SDF document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SdfDocument {
    pub models: Vec<Model>,
}

impl SdfDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_model(&mut self, model: Model) {
        self.models.push(model);
    }

    /// Serialize the document as indented XML.
    pub fn to_xml(&self) -> Result<String> {
        let mut buffer = Vec::new();
        let mut writer = Writer::new_with_indent(Cursor::new(&mut buffer), b' ', 2);

        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml_err)?;

        let mut sdf = BytesStart::new("sdf");
        sdf.push_attribute(("version", SDF_VERSION));
        writer.write_event(Event::Start(sdf)).map_err(xml_err)?;

        for model in &self.models {
            let mut start = BytesStart::new("model");
            start.push_attribute(("name", model.name.as_str()));
            writer.write_event(Event::Start(start)).map_err(xml_err)?;
            for link in &model.links {
                write_link(&mut writer, link)?;
            }
            writer
                .write_event(Event::End(BytesEnd::new("model")))
                .map_err(xml_err)?;
        }

        writer
            .write_event(Event::End(BytesEnd::new("sdf")))
            .map_err(xml_err)?;

        String::from_utf8(buffer).map_err(|e| Error::XmlWrite {
            reason: e.to_string(),
        })
    }

    /// Serialize and write the document, overwriting any existing file.
    pub fn write_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let xml = self.to_xml()?;
        std::fs::write(path, xml).map_err(|e| Error::DocumentWrite {
            path: path.to_string_lossy().to_string(),
            reason: e.to_string(),
        })
    }
}

fn write_link<W: std::io::Write>(writer: &mut Writer<W>, link: &Link) -> Result<()> {
    let mut start = BytesStart::new("link");
    start.push_attribute(("name", link.name.as_str()));
    writer.write_event(Event::Start(start)).map_err(xml_err)?;

    writer
        .write_event(Event::Start(BytesStart::new("inertial")))
        .map_err(xml_err)?;
    write_text_element(writer, "pose", &link.inertial.pose.to_text())?;
    write_text_element(writer, "mass", &link.inertial.mass.to_string())?;

    writer
        .write_event(Event::Start(BytesStart::new("inertia")))
        .map_err(xml_err)?;
    let inertia = &link.inertial.inertia;
    write_text_element(writer, "ixx", &inertia.ixx.to_string())?;
    write_text_element(writer, "ixy", &inertia.ixy.to_string())?;
    write_text_element(writer, "ixz", &inertia.ixz.to_string())?;
    write_text_element(writer, "iyy", &inertia.iyy.to_string())?;
    write_text_element(writer, "iyz", &inertia.iyz.to_string())?;
    write_text_element(writer, "izz", &inertia.izz.to_string())?;
    writer
        .write_event(Event::End(BytesEnd::new("inertia")))
        .map_err(xml_err)?;

    writer
        .write_event(Event::End(BytesEnd::new("inertial")))
        .map_err(xml_err)?;
    writer
        .write_event(Event::End(BytesEnd::new("link")))
        .map_err(xml_err)?;
    Ok(())
}

fn write_text_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    text: &str,
) -> Result<()> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(xml_err)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(xml_err)?;
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(xml_err)?;
    Ok(())
}

fn xml_err(e: impl std::fmt::Display) -> Error {
    Error::XmlWrite {
        reason: e.to_string(),
    }
}
