//! Built-in keyword lists used when a dictionary file cannot be read.

/// Resource name of the accepted-institution dictionary.
pub const INSTITUTIONS_FILE: &str = "DiccionarioInstitucionesCUN.txt";

/// Look up the built-in list for a resource name.
pub fn embedded_dictionary(name: &str) -> &'static [&'static str] {
    match name {
        "Diccionario_Documentos_Identidad.txt" => &[
            "Cédula de Ciudadania",
            "Cedula de Ciudadania",
            "Cédula",
            "Cedula",
            "Pasaporte",
            "República de Colombia",
            "Republica de Colombia",
            "Tarjeta",
            "Identidad",
            "Registrador",
            "Colombia",
        ],
        "DiccionarioActayDiplomaBachiller.txt" => &[
            "Bachiller académico",
            "Bachiller Técnico",
            "Bachiller",
            "Diploma",
            "institución",
            "Colegio",
            "Acta",
        ],
        "DiccionarioActayDiplomaTecnico.txt" => &["Técnico", "Técnica", "Tecnico", "Tecnica"],
        "DiccionarioActayDiplomaTecnologo.txt" => {
            &["Tecnólogo", "Tecnología", "Tecnologo", "Tecnologia"]
        }
        "DiccionarioActayDiplomaPregrado.txt" => &[
            "Ingeniería",
            "Licenciado",
            "Administrador",
            "Abogado",
            "Profesional",
            "Diploma",
            "Acta",
            "Grado",
        ],
        "DiccionarioTYT.txt" => &[
            "Saber TyT",
            "Saber T",
            "Técnico",
            "Tecnólogo",
            "Icfes",
            "Puntaje Global",
            "Percentil",
            "Pruebas",
        ],
        "DiccionarioIcfes.txt" => &[
            "Saber 11",
            "educación superior",
            "Icfes",
            "Registro",
            "Puntaje",
            "Reporte De Resultados",
        ],
        "DiccionarioPagoDerechosDeGrado.txt" => &[
            "Aprobado",
            "pago",
            "transaccion",
            "banco",
            "total",
            "pagado",
            "exitoso",
            "detalle del pago",
            "referencia",
        ],
        "DiccionarioEncuestaSeguimiento.txt" => &[
            "Constancia",
            "Mejoramiento",
            "Observatorio",
            "Laboral",
            "Encuesta",
            "Seguimiento",
            "Graduados",
            "SNIES",
        ],
        "DiccionarioActaHomologacion.txt" => &[
            "Homologación",
            "Homologacion",
            "Materias",
            "asignaturas",
            "créditos",
            "creditos",
            "equivalencia",
        ],
        INSTITUTIONS_FILE => &[
            "Corporación Unificada Nacional de Educación Superior",
            "Corporacion Unificada Nacional de Educacion Superior",
            "Corporación Unificada Nacional",
            "Corporacion Unificada Nacional",
            "CUN",
        ],
        _ => &[],
    }
}
