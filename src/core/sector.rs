pub const GENERAL_SECTOR: &str = "General";

/// UNSPSC family (first two digits) to sector label. Order matters: on a
/// tie the sector listed first wins.
pub const SECTOR_FAMILIES: &[(&str, &str)] = &[
    ("72", "Construcción e Infraestructura"),
    ("30", "Construcción e Infraestructura"),
    ("95", "Construcción e Infraestructura"),
    ("43", "Tecnología y Telecomunicaciones"),
    ("81", "Tecnología y Telecomunicaciones"),
    ("80", "Servicios de Gestión y Profesionales"),
    ("85", "Servicios de Salud"),
    ("50", "Alimentos y Bebidas"),
    ("53", "Ropa, Maletas y Productos de Aseo"),
    ("44", "Equipos de Oficina y Accesorios"),
    ("39", "Suministros y Equipos Eléctricos"),
    ("41", "Equipos de Laboratorio y Medición"),
];

fn sector_for_family(family: &str) -> Option<&'static str> {
    SECTOR_FAMILIES
        .iter()
        .find(|(prefix, _)| *prefix == family)
        .map(|(_, sector)| *sector)
}

/// Plurality vote of the codes' families. Codes from unknown families are
/// ignored; no known family at all gives [`GENERAL_SECTOR`].
pub fn classify<S: AsRef<str>>(codes: &[S]) -> &'static str {
    let mut tally: Vec<(&'static str, usize)> = Vec::new();

    for code in codes {
        let Some(family) = code.as_ref().get(..2) else {
            continue;
        };
        if let Some(sector) = sector_for_family(family) {
            match tally.iter_mut().find(|(s, _)| *s == sector) {
                Some((_, count)) => *count += 1,
                None => tally.push((sector, 1)),
            }
        }
    }

    let mut best = GENERAL_SECTOR;
    let mut best_count = 0;
    for &(_, sector) in SECTOR_FAMILIES {
        let count = tally
            .iter()
            .find(|(s, _)| *s == sector)
            .map(|(_, c)| *c)
            .unwrap_or(0);
        if count > best_count {
            best = sector;
            best_count = count;
        }
    }
    best
}
