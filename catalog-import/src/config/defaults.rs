//! Built-in tables for the product catalog export

use std::collections::HashMap;

pub const INPUT_PATH: &str = "public/Fichas_tecnicas-2026_02_14-18_22.xlsx";
pub const OUTPUT_PATH: &str = "import_data_final.json";

pub const EXCLUDED_SHEETS: &[&str] = &["Ayuda", "hidden"];

pub const HEADER_TOKENS: &[&str] = &["sku", "titulo", "title", "item_id"];

pub const FALLBACK_CATEGORY: &str = "outdoor";

/// Sheet names as they appear in the export (truncated names included)
pub const SHEET_CATEGORIES: &[(&str, &str)] = &[
    // Pesca
    ("Senuelos de pesca", "senuelos"),
    ("Carretes de pesca", "carretes-de-pesca"),
    ("Canas de pescar", "canas-de-pesca"),
    ("Lineas de pesca", "lineas"),
    ("Anzuelos de pesca", "anzuelos-jig-heads"),
    ("Remeras de pesca", "indumentaria-pesca"),
    ("Portacanas de pesca", "equipamiento-pesca"),
    ("Cajas de accesorios de pesca", "cajas-de-senuelos"),
    ("Boyas de pesca", "accesorios-pesca-tradicional"),
    ("Guantes y mitones para pesca", "indumentaria-pesca"),
    ("Pinzas de pesca", "herramientas-pesca"),
    ("Imanes para pesca", "accesorios-pesca-tradicional"),
    // Outdoor / camping
    ("Equipamiento para camping y ...", "equipamiento-outdoor"),
    ("Linternas", "iluminacion"),
    ("Infladores manuales y de pie", "esenciales-camping"),
    ("Cargadores de baterias y pilas", "accesorios-supervivencia"),
    ("Bolsas secas", "mochilas-y-bolsos"),
    ("Mochilas", "mochilas-y-bolsos"),
    ("Bolsas de hidratacion", "hidratacion"),
    // Cuchillería / caza
    ("Cuchillos tacticos y deportivos", "cuchillos"),
    ("Cuchillos de buceo", "cuchillos-outdoor"),
    ("Cuchillos de cocina", "cuchillos-cocina"),
    ("Fundas para armas", "accesorios-caza"),
    ("Afiladores manuales para el ...", "herramientas-pesca"),
    ("Redes de caza", "accesorios-caza"),
    ("Bastones de tiro", "accesorios-caza"),
    ("Postones", "postones"),
    // Ropa
    ("Trajes de neopreno", "waders"),
    ("Waders", "waders"),
    ("Lentes deportivos", "anteojos-y-straps"),
    // Otros
    ("Articulos de belleza y cuida...", "accesorios-vestuario"),
    ("Deportes y fitness", "outdoor"),
    ("Suplementos", "outdoor"),
    ("Equipamiento para aerobics y...", "outdoor"),
    ("Medidores laser", "opticos"),
    ("Maletas", "bolsos-y-mochilas-pesca"),
    ("Cronometros", "accesorios-vestuario"),
];

/// Checked in order against the lowercased sheet name
pub const CATEGORY_RULES: &[(&str, &str)] = &[
    ("pesca", "pesca-deportiva"),
    ("cuchillo", "cuchillos"),
    ("camping", "equipamiento-outdoor"),
];

pub const TRANSLATIONS: &[(&str, &str)] = &[
    ("WEIGHT", "Peso"),
    ("LENGTH", "Largo"),
    ("HEIGHT", "Altura"),
    ("WIDTH", "Ancho"),
    ("DEPTH", "Profundidad"),
    ("MATERIAL", "Material"),
    ("COLOR", "Color"),
    ("SIZE", "Tamaño"),
    ("CAPACITY", "Capacidad"),
    ("LINE_CAPACITY", "Capacidad de línea"),
    ("GEAR_RATIO", "Relación de transmisión"),
    ("MAX_DRAG", "Freno Máximo"),
    ("BEARINGS_NUMBER", "Rodamientos"),
    ("ROD_ACTION", "Acción"),
    ("ROD_POWER", "Potencia"),
    ("SECTIONS_NUMBER", "Secciones"),
    ("LURE_WEIGHT", "Peso de señuelo"),
    ("MAX_HEIGHT", "Altura Máxima"),
    ("MAX_WEIGHT_SUPPORTED", "Peso Máximo Soportado"),
    ("SHOOTING_STICK_TYPE", "Tipo de soporte"),
    ("IS_WATERPROOF", "Es impermeable"),
    ("WITH_UV_PROTECTION", "Con protección UV"),
    ("LENS_COLOR", "Color del lente"),
    ("FRAME_COLOR", "Color del marco"),
    ("TEMPLE_COLOR", "Color de la varilla"),
    ("LENS_MATERIAL", "Material del lente"),
    ("FRAME_MATERIAL", "Material del marco"),
];

/// Marketplace bookkeeping columns
pub const IGNORED_COLUMNS: &[&str] = &[
    "ID",
    "ITEM_ID",
    "FAMILY_ID",
    "DOMAIN_ID",
    "CATEGORY_ID",
    "PARENT_CATEGORY_ID",
    "CHECK_SUMS",
    "VARIATION_ID",
    "GTIN",
    "SELLER_SKU",
    "PRODUCT_NUMBER",
    "ITEM_NUMBER",
    "MAIN_COLOR",
    "COLOR_PRIMARY_COLOR",
    "TAGS",
    "ESHOP_ID",
    "CATALOG_PRODUCT_ID",
];

pub const PLACEHOLDER_VALUES: &[&str] = &[
    "FIXED",
    "ATTRIBUTE",
    "N/A",
    "NAN",
    "IGNORE",
    "MANDATORY",
    "OPTIONAL",
    "NO APLICA",
];

/// Instruction rows in the export repeat these in the title column
pub const TITLE_ARTIFACTS: &[&str] = &[
    "TÍTULO",
    "TITLE",
    "PRODUCT_NAME",
    "NAME",
    "FIXED",
    "ATTRIBUTE",
    "VALUES",
    "GROUPS",
    "TAGS",
];

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn pairs(items: &[(&str, &str)]) -> HashMap<String, String> {
    items
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
