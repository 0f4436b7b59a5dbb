//! Workshop, client and order-line forms.

use taller_types::{ClientDraft, OrderDraft, TallerDraft};

use super::rules::{NumberOrText, has_min_chars, non_empty};
use super::{FieldErrors, Validate};

const NAME_SHORT: &str = "El nombre debe tener al menos 2 caracteres";
const COLOR_SHORT: &str = "El color debe tener al menos 2 caracteres";
const TALLE_REQUIRED: &str = "El campo 'talle' es obligatorio";
const CANTIDAD_REQUIRED: &str = "El campo cantidad es obligatorio";
const CANTIDAD_INVALID: &str = "La cantidad debe ser un número válido mayor o igual a 0.";
const DEUDA_INVALID: &str = "La deuda debe ser un número válido mayor o igual a 0.";

fn check_name(errors: &mut FieldErrors, nombre: &str) {
    if !has_min_chars(nombre, 2) {
        errors.add("nombre", NAME_SHORT);
    }
}

fn is_non_negative(value: &NumberOrText) -> bool {
    let n = value.to_number();
    n.is_finite() && n >= 0.0
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TallerForm {
    pub nombre: String,
    /// Image URI; empty means none
    pub icono: Option<String>,
}

impl Validate for TallerForm {
    type Output = TallerDraft;

    fn validate(&self) -> Result<TallerDraft, FieldErrors> {
        let mut errors = FieldErrors::new();
        check_name(&mut errors, &self.nombre);
        errors.into_result(|| TallerDraft {
            name: self.nombre.clone(),
            icon: non_empty(self.icono.as_deref()),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClienteForm {
    pub nombre: String,
    pub telefono: Option<String>,
    /// Outstanding debt; absent or empty leaves it unset
    pub deuda: Option<NumberOrText>,
    /// Workshop the client belongs to
    pub taller_id: Option<String>,
}

impl Validate for ClienteForm {
    type Output = ClientDraft;

    fn validate(&self) -> Result<ClientDraft, FieldErrors> {
        let mut errors = FieldErrors::new();
        check_name(&mut errors, &self.nombre);

        let deuda = self.deuda.as_ref().filter(|d| !d.is_empty_text());
        if let Some(d) = deuda
            && !is_non_negative(d)
        {
            errors.add("deuda", DEUDA_INVALID);
        }

        errors.into_result(|| ClientDraft {
            name: self.nombre.clone(),
            phone: non_empty(self.telefono.as_deref()),
            deuda: deuda.map(NumberOrText::normalized),
            activo: None,
            taller_id: non_empty(self.taller_id.as_deref()),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PedidoForm {
    pub nombre: String,
    pub color: String,
    pub talle: NumberOrText,
    pub cantidad: NumberOrText,
    /// Client the order line belongs to
    pub client_id: Option<String>,
}

impl Validate for PedidoForm {
    type Output = OrderDraft;

    fn validate(&self) -> Result<OrderDraft, FieldErrors> {
        let mut errors = FieldErrors::new();
        check_name(&mut errors, &self.nombre);
        if !has_min_chars(&self.color, 2) {
            errors.add("color", COLOR_SHORT);
        }

        let talle = self.talle.to_number();
        if !(talle.is_finite() && talle > 0.0) {
            errors.add("talle", TALLE_REQUIRED);
        }

        if self.cantidad.is_empty_text() {
            errors.add("cantidad", CANTIDAD_REQUIRED);
        } else if !is_non_negative(&self.cantidad) {
            errors.add("cantidad", CANTIDAD_INVALID);
        }

        errors.into_result(|| OrderDraft {
            nombre: self.nombre.clone(),
            color: self.color.clone(),
            talle: self.talle.normalized(),
            cantidad: self.cantidad.normalized(),
            client_id: non_empty(self.client_id.as_deref()),
        })
    }
}
