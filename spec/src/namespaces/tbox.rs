//! `labop_device_tbox`: the device terminology box.
//!
//! Device classes and the properties a labware catalogue can state about
//! them: physical dimensions (millimetres), handling parameters, materials,
//! well geometry, and vendor identifiers. `Device` subclasses both the
//! extension's generic device and the upper ontology's `Device`.
//!
//! Every property is functional except `hasMaterial`, which lists the
//! materials a device is made of.

use crate::error::Error;
use crate::model::Primitive;
use crate::model::Primitive::{Boolean, Float, Integer, String as Text};
use crate::schema::{self, ClassSpec, PropertySpec, RangeSpec, SchemaContext, SchemaSummary, TermRef};
use crate::store::GraphStore;

/// Base IRI.
pub const IRI: &str = "http://www.labop.org/labop_device_tbox";

/// Serializer prefix.
pub const PREFIX: &str = "lodevt";

/// Class catalogue rows default to.
pub const DEFAULT_CLASS: &str = "Device";

const fn class(name: &'static str, comment: &'static str) -> ClassSpec {
    ClassSpec {
        name,
        comment,
        parents: &[],
        wikipedia: None,
    }
}

/// A functional datatype property on `Device`.
const fn data(name: &'static str, range: Primitive, comment: &'static str) -> PropertySpec {
    PropertySpec {
        name,
        comment,
        domain: TermRef::Local(DEFAULT_CLASS),
        range: RangeSpec::Primitive(range),
        functional: true,
    }
}

/// A functional object property on `Device`.
const fn object(name: &'static str, range: TermRef, comment: &'static str) -> PropertySpec {
    PropertySpec {
        name,
        comment,
        domain: TermRef::Local(DEFAULT_CLASS),
        range: RangeSpec::Class(range),
        functional: true,
    }
}

/// Class table.
pub const CLASSES: &[ClassSpec] = &[
    // Visual representation
    class("ModelIcon", "Icon of the device."),
    class("Model2D", "2D model of the device."),
    ClassSpec {
        wikipedia: Some("https://en.wikipedia.org/wiki/3D_modeling"),
        ..class("Model3D", "3D model of the device.")
    },
    // Well shape
    class(
        "ShapePolygonXY",
        "Generalized shape polygon for more complex well shapes, in the xy plane.",
    ),
    class(
        "ShapePolygonZ",
        "Generalized shape polygon for more complex well shapes, along the z (rotation) axis.",
    ),
    class("ShapeModel2D", "2D model of a well shape."),
    class("ShapeModel3D", "3D model of a well shape."),
    ClassSpec {
        parents: &[TermRef::Upper("Vector")],
        ..class(
            "FirstInteractionPosition",
            "Position of the first interaction point of a pipette tip with a well, or of a \
             needle with a septum, relative to the upper left corner of the device.",
        )
    },
    // Vendor
    class("Vendor", "Device vendor."),
    class("VendorProductNumber", "Device vendor product number."),
    ClassSpec {
        wikipedia: Some("https://en.wikipedia.org/wiki/UNSPSC"),
        ..class(
            "UNSPSC",
            "United Nations Standard Products and Services Code (UNSPSC) of a device.",
        )
    },
    ClassSpec {
        wikipedia: Some("https://en.wikipedia.org/wiki/EClass"),
        ..class("EClass", "eCl@ss classification of a device.")
    },
    ClassSpec {
        name: "Device",
        comment: "A physical object used in a scientific lab that is not a consumable. It can be \
                  a single object or a set of objects that are used together.",
        parents: &[TermRef::Extension("Device"), TermRef::Upper("Device")],
        wikipedia: Some("https://en.wikipedia.org/wiki/Device"),
    },
    // Location
    ClassSpec {
        parents: &[TermRef::Extension("Building")],
        ..class("Building", "A building housing laboratories.")
    },
    ClassSpec {
        parents: &[TermRef::Extension("Laboratory")],
        ..class("Laboratory", "A laboratory.")
    },
    ClassSpec {
        parents: &[TermRef::Extension("Room")],
        ..class("Room", "A room.")
    },
];

/// Property table.
pub const PROPERTIES: &[PropertySpec] = &[
    // Physical dimensions
    data("hasLength", Float, "Device total length, without any additions like lids."),
    data("hasLengthTolerance", Float, "Relative length tolerance (measured / target length)."),
    data("hasWidth", Float, "Device total width, without any additions like lids."),
    data("hasWidthTolerance", Float, "Relative width tolerance (measured / target width)."),
    data("hasHeight", Float, "Device total height, without any additions like lids."),
    data("hasHeightTolerance", Float, "Relative height tolerance (measured / target height)."),
    data("hasGrippingHeight", Float, "Height at which a robot gripper holds the device."),
    data("hasGrippingHeightLidding", Float, "Gripping height used while lidding the device."),
    data("hasGrippingHeightWithLid", Float, "Gripping height of the lidded device."),
    object("hasGrippingPressure", TermRef::Upper("Pressure"), "Maximum gripping pressure."),
    data("hasRadiusXY", Float, "Radius of a round device in the xy plane."),
    data("hasRadiusZ", Float, "Radius of a round device along the z axis."),
    data("hasVolume", Float, "Total device volume."),
    data("hasHightLidded", Float, "Device total height including additions like lids."),
    data("hasHightStacked", Float, "Stacking height without additions like lids."),
    data("hasHightStackedLidded", Float, "Stacking height with additions like lids."),
    data("hasMass", Float, "Mass of the device."),
    object(
        "hasMaxSheerForce",
        TermRef::Upper("Force"),
        "Maximum sheer force the device withstands, e.g. during centrifugation.",
    ),
    // Appearance and material
    data("hasCoatingMaterial", Text, "Device coating material."),
    data("hasColorDescription", Text, "Colour description, e.g. white, black, transparent."),
    data("hasColorRGB", Text, "Device colour as an RGB hex string."),
    data("isLiddable", Boolean, "Whether the device can carry a lid."),
    data("isStackable", Boolean, "Whether devices of this kind can be stacked."),
    data("isSealable", Boolean, "Whether the container can be sealed."),
    data("hasSetptum", Boolean, "Whether the device has a septum."),
    PropertySpec {
        functional: false,
        ..data(
            "hasMaterial",
            Text,
            "Material of the device (polymer, glass, ...); a device can list several.",
        )
    },
    data("hasSeptumMaterial", Text, "Septum material."),
    object(
        "hasSeptumPenetrationForce",
        TermRef::Upper("Force"),
        "Force needed to penetrate the septum.",
    ),
    // Grid
    data("hasNumCols", Integer, "Number of columns of a multi-well device."),
    data("hasNumRows", Integer, "Number of rows of a multi-well device."),
    data("hasNumWells", Integer, "Number of wells of a multi-well device."),
    // Production metadata
    data("hasManufacturer", Text, "Name of the manufacturer."),
    data("isProductType", Text, "Device product type."),
    data("hasModelID", Text, "Device model ID or number."),
    data("hasProductID", Text, "Manufacturer product ID or number."),
    // Wells
    data("hasWellVolume", Float, "Volume of a single well."),
    data("hasA1Position", Text, "Position of well A1."),
    data("hasWellDistRow", Float, "Well-to-well distance in row direction."),
    data("hasWellDistCol", Float, "Well-to-well distance in column direction."),
    data("hasDepthWell", Float, "Total well depth."),
    data("hasShapeWell", Text, "Overall or top well shape, e.g. round, square, baffled."),
    data("hasShapeWellBottom", Text, "Well bottom shape, e.g. flat, round, conical."),
    data("hasTopRadiusXY", Float, "Radius of a round well at its top opening, xy plane."),
    data("hasBottomRadiusXY", Float, "Radius of a round well bottom, xy plane."),
    data("hasBottomRadiusZ", Float, "Radius of a round well bottom along the z axis."),
    data("hasConeAngle", Float, "Opening angle of a conical well, in degrees."),
    data("hasConeDepth", Float, "Depth of a cone from where the conical shape begins."),
    data("hasShapePolygonXY", Float, "Generalized well shape polygon in the xy plane."),
    data("hasShapePolygonZ", Text, "Generalized well shape polygon along the z axis."),
    data("hasShapeModel2D", Text, "2D model of the well shape."),
    data("hasShapeModel3D", Text, "3D model of the well shape."),
    data("hasImageLink", Text, "Link to an image of the device."),
    // Screw cap
    data("hasScrewCap", Boolean, "Whether the device has a screw cap."),
    data("hasScrewCapMaterial", Text, "Screw cap material."),
    data("hasScrewCapColor", Text, "Screw cap colour."),
    // Vendor
    data("hasVendorName", Text, "Vendor name."),
    data("hasVendorProductID", Text, "Vendor product ID."),
    data("hasUNSPSC", Text, "UNSPSC code."),
    data("hasEClass", Text, "eCl@ss code."),
    data("hasEAN", Text, "EAN code."),
    object("hasVendor", TermRef::Local("Vendor"), "Vendor of the device."),
    // Representation links
    object(
        "hasFirstInteractionPosition",
        TermRef::Local("FirstInteractionPosition"),
        "First interaction position of the device.",
    ),
    object("hasModelIcon", TermRef::Local("ModelIcon"), "Icon of the device."),
    object("hasModel2D", TermRef::Local("Model2D"), "2D model of the device."),
    object("hasModel3D", TermRef::Local("Model3D"), "3D model of the device."),
    object(
        "isLocatedIn",
        TermRef::Extension("Location"),
        "Location where the device is kept.",
    ),
];

/// Creates the TBox namespace and commits the device schema.
///
/// # Errors
///
/// Returns [`Error::Load`] if a namespace it builds on is missing or the
/// TBox is already loaded, and [`Error::Schema`] if the table cannot be
/// resolved. A failed schema leaves the TBox namespace empty and the build
/// must not continue.
pub fn define(store: &mut GraphStore, upper: &str, extension: &str) -> Result<SchemaSummary, Error> {
    let ns = store.load_namespace(IRI, PREFIX, None)?;
    super::describe(
        ns,
        "LabOP device ontology terminology box",
        "Device classes and properties for laboratory automation (labware, plates, tubes).",
    );
    schema::apply(
        store,
        SchemaContext {
            target: IRI,
            upper,
            extension: Some(extension),
        },
        CLASSES,
        PROPERTIES,
    )
}
