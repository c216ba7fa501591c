use chrono::NaiveDate;
use serde::Serialize;

pub const DEFAULT_DOC_TYPE: &str = "LP_INTRODUCE_GOODS";

/// "Create document" payload for introducing goods into circulation.
///
/// Wire names are fixed by the remote API. Most are snake_case, the two
/// camelCase ones are renamed explicitly. Dates go out as `YYYY-MM-DD` and
/// unset optional fields are left out.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Document {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Description>,
    pub doc_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_status: Option<String>,
    pub doc_type: String,
    #[serde(rename = "importRequest")]
    pub import_request: bool,
    pub owner_inn: String,
    pub participant_inn: String,
    pub producer_inn: String,
    pub production_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub production_type: Option<String>,
    pub products: Vec<Product>,
    pub reg_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reg_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Description {
    #[serde(rename = "participantInn")]
    pub participant_inn: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Product {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_document: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_document_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_document_number: Option<String>,
    pub owner_inn: String,
    pub producer_inn: String,
    pub production_date: NaiveDate,
    pub tnved_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uit_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uitu_code: Option<String>,
}

impl Document {
    /// Start a document with the mandatory identifiers; everything else can
    /// be filled in with the `with_*` methods.
    pub fn new(
        doc_id: impl Into<String>,
        participant_inn: impl Into<String>,
        production_date: NaiveDate,
        reg_date: NaiveDate,
    ) -> Self {
        let participant_inn = participant_inn.into();
        Self {
            description: None,
            doc_id: doc_id.into(),
            doc_status: None,
            doc_type: DEFAULT_DOC_TYPE.to_string(),
            import_request: false,
            owner_inn: participant_inn.clone(),
            participant_inn: participant_inn.clone(),
            producer_inn: participant_inn,
            production_date,
            production_type: None,
            products: Vec::new(),
            reg_date,
            reg_number: None,
        }
    }

    pub fn with_description(mut self, participant_inn: impl Into<String>) -> Self {
        self.description = Some(Description {
            participant_inn: participant_inn.into(),
        });
        self
    }

    pub fn with_status(mut self, doc_status: impl Into<String>) -> Self {
        self.doc_status = Some(doc_status.into());
        self
    }

    pub fn with_type(mut self, doc_type: impl Into<String>) -> Self {
        self.doc_type = doc_type.into();
        self
    }

    pub fn with_import_request(mut self, import_request: bool) -> Self {
        self.import_request = import_request;
        self
    }

    pub fn with_owner_inn(mut self, owner_inn: impl Into<String>) -> Self {
        self.owner_inn = owner_inn.into();
        self
    }

    pub fn with_producer_inn(mut self, producer_inn: impl Into<String>) -> Self {
        self.producer_inn = producer_inn.into();
        self
    }

    pub fn with_production_type(mut self, production_type: impl Into<String>) -> Self {
        self.production_type = Some(production_type.into());
        self
    }

    pub fn with_reg_number(mut self, reg_number: impl Into<String>) -> Self {
        self.reg_number = Some(reg_number.into());
        self
    }

    pub fn with_product(mut self, product: Product) -> Self {
        self.products.push(product);
        self
    }
}

impl Product {
    pub fn new(
        owner_inn: impl Into<String>,
        producer_inn: impl Into<String>,
        production_date: NaiveDate,
        tnved_code: impl Into<String>,
    ) -> Self {
        Self {
            certificate_document: None,
            certificate_document_date: None,
            certificate_document_number: None,
            owner_inn: owner_inn.into(),
            producer_inn: producer_inn.into(),
            production_date,
            tnved_code: tnved_code.into(),
            uit_code: None,
            uitu_code: None,
        }
    }

    pub fn with_certificate(
        mut self,
        document: impl Into<String>,
        number: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        self.certificate_document = Some(document.into());
        self.certificate_document_number = Some(number.into());
        self.certificate_document_date = Some(date);
        self
    }

    pub fn with_uit_code(mut self, uit_code: impl Into<String>) -> Self {
        self.uit_code = Some(uit_code.into());
        self
    }

    pub fn with_uitu_code(mut self, uitu_code: impl Into<String>) -> Self {
        self.uitu_code = Some(uitu_code.into());
        self
    }
}
