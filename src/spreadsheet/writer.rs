//! # Write Engine
//!
//! Writing is two-phase: a [`WorkbookSpecBuilder`] validates registrations and
//! produces an immutable [`WorkbookSpec`], then [`WriteEngine::write`] turns it
//! into an xlsx payload in one pass.
use crate::error::SheetError;
use crate::helpers::zip::PackageWriter;
use crate::options::EngineOptions;
use crate::schema::ColumnType;
use crate::schema::RowDescriptor;
use crate::schema::TableDescriptor;
use crate::schema::Value;
use crate::spreadsheet::converter::CellConverter;
use crate::spreadsheet::converter::CellLiteral;
use crate::spreadsheet::converter::CellStorage;
use crate::spreadsheet::reference::col_to_letter;
use crate::spreadsheet::styles::generate_stylesheet;
use crate::spreadsheet::styles::BODY_STYLE;
use crate::spreadsheet::styles::HEADER_STYLE;
use log::debug;
use quick_xml::escape::escape;
use std::fmt::Write as FmtWrite;

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n";
const NS_MAIN: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const NS_RELATIONSHIPS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_PACKAGE_RELATIONSHIPS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_WORKSHEET: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";
const REL_STYLES: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
const REL_OFFICE_DOCUMENT: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const CT_WORKBOOK: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";
const CT_WORKSHEET: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml";
const CT_STYLES: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml";

/// A registered table together with the rows to write into it.
#[derive(Clone, Debug, PartialEq)]
pub struct TableSpec {
    pub table: TableDescriptor,
    /// Rows in write order, `None` when the table was never filled
    pub rows: Option<Vec<RowDescriptor>>,
}

/// Immutable description of a workbook to write.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WorkbookSpec {
    tables: Vec<TableSpec>,
    empty_sheets: Vec<String>,
}

impl WorkbookSpec {
    pub fn builder() -> WorkbookSpecBuilder {
        WorkbookSpecBuilder::default()
    }

    pub fn tables(&self) -> &[TableSpec] {
        &self.tables
    }

    pub fn empty_sheets(&self) -> &[String] {
        &self.empty_sheets
    }

    /// Returns true if any table declares a formula column.
    pub fn has_formula(&self) -> bool {
        self.tables.iter().any(|spec| spec.table.has_formula())
    }
}

/// Collects tables, rows and empty sheets, enforcing one table per sheet.
#[derive(Clone, Debug, Default)]
pub struct WorkbookSpecBuilder {
    tables: Vec<TableSpec>,
    empty_sheets: Vec<String>,
}

impl WorkbookSpecBuilder {
    fn is_sheet_taken(&self, sheet_name: &str) -> bool {
        self.tables.iter().any(|spec| spec.table.sheet_name() == sheet_name)
            || self.empty_sheets.iter().any(|name| name == sheet_name)
    }

    /// Adds a table. Only one table per sheet is admitted.
    pub fn add_table(mut self, table: TableDescriptor) -> Result<Self, SheetError> {
        if self.tables.iter().any(|spec| spec.table.name() == table.name()) {
            Err(SheetError::DuplicateTable(table.name().to_owned()))?
        }
        if self.is_sheet_taken(table.sheet_name()) {
            Err(SheetError::DuplicateSheet(table.sheet_name().to_owned()))?
        }
        self.tables.push(TableSpec { table, rows: None });
        Ok(self)
    }

    /// Supplies the rows of a registered table.
    pub fn fill_table(mut self, table_name: &str, rows: Vec<RowDescriptor>) -> Result<Self, SheetError> {
        let spec = self
            .tables
            .iter_mut()
            .find(|spec| spec.table.name() == table_name)
            .ok_or_else(|| SheetError::TableNotFound(table_name.to_owned()))?;
        if spec.rows.is_some() {
            Err(SheetError::RowsAlreadySupplied(table_name.to_owned()))?
        }
        spec.rows = Some(rows);
        Ok(self)
    }

    /// Adds a sheet without any table. Empty sheets follow the table sheets.
    pub fn add_empty_sheet(mut self, name: impl Into<String>) -> Result<Self, SheetError> {
        let name = name.into();
        if self.is_sheet_taken(&name) {
            return Err(SheetError::DuplicateSheet(name));
        }
        self.empty_sheets.push(name);
        Ok(self)
    }

    pub fn build(self) -> WorkbookSpec {
        WorkbookSpec {
            tables: self.tables,
            empty_sheets: self.empty_sheets,
        }
    }
}

/// Serializes workbook specs into xlsx payloads.
pub struct WriteEngine {
    converter: CellConverter,
}

impl WriteEngine {
    /// Creates a write engine with the built-in cell conversions.
    pub fn new(options: EngineOptions) -> Result<Self, SheetError> {
        Ok(Self::with_converter(CellConverter::new(options)?))
    }

    pub fn with_converter(converter: CellConverter) -> Self {
        Self { converter }
    }

    /// Writes the whole workbook and returns the container bytes.
    pub fn write(&self, spec: &WorkbookSpec) -> Result<Vec<u8>, SheetError> {
        let mut sheet_names = Vec::<&str>::new();
        let mut worksheets = Vec::<String>::new();
        for table_spec in &spec.tables {
            let rows = table_spec.rows.as_deref().unwrap_or_default();
            worksheets.push(self.write_table(&table_spec.table, rows)?);
            sheet_names.push(table_spec.table.sheet_name());
            debug!(
                "Write table '{}' into sheet '{}' with {} rows",
                table_spec.table.name(),
                table_spec.table.sheet_name(),
                rows.len()
            );
        }
        for name in &spec.empty_sheets {
            worksheets.push(generate_empty_worksheet());
            sheet_names.push(name);
            debug!("Write empty sheet '{}'", name);
        }

        let has_formula = spec.has_formula();
        let mut package = PackageWriter::new();
        package.add_part("[Content_Types].xml", &generate_content_types(worksheets.len())?)?;
        package.add_part("_rels/.rels", &generate_root_relationships()?)?;
        package.add_part("xl/workbook.xml", &generate_workbook(&sheet_names, has_formula)?)?;
        package.add_part("xl/_rels/workbook.xml.rels", &generate_workbook_relationships(worksheets.len())?)?;
        package.add_part("xl/styles.xml", &generate_stylesheet()?)?;
        for (index, worksheet) in worksheets.iter().enumerate() {
            package.add_part(&format!("xl/worksheets/sheet{}.xml", index + 1), worksheet)?;
        }
        package.finish()
    }

    /// Generates the worksheet of one table: header row then data rows.
    fn write_table(&self, table: &TableDescriptor, rows: &[RowDescriptor]) -> Result<String, SheetError> {
        let letters = table
            .columns()
            .iter()
            .enumerate()
            .map(|(col, _)| col_to_letter(col))
            .collect::<Result<Vec<_>, _>>()?;

        let mut xml = String::with_capacity(1024 + rows.len() * table.columns().len() * 48);
        xml.push_str(XML_DECLARATION);
        write!(xml, "<worksheet xmlns=\"{NS_MAIN}\" xmlns:r=\"{NS_RELATIONSHIPS}\"><sheetData>")?;

        xml.push_str("<row r=\"1\">");
        for (column, letter) in table.columns().iter().zip(&letters) {
            let header = self.converter.convert(&Value::from(column.header_text.as_str()), ColumnType::String, 1)?;
            write_cell(&mut xml, letter, 1, HEADER_STYLE, &header)?;
        }
        xml.push_str("</row>");

        for (index, row) in rows.iter().enumerate() {
            let row_number = index + 2;
            write!(xml, "<row r=\"{}\">", row_number)?;
            for (column, letter) in table.columns().iter().zip(&letters) {
                let value = row.get(&column.name).ok_or_else(|| SheetError::MissingValue {
                    table: table.name().to_owned(),
                    column: column.name.to_owned(),
                    row: row.row_number,
                })?;
                let literal = self.converter.convert(value, column.kind, row_number)?;
                write_cell(&mut xml, letter, row_number, BODY_STYLE, &literal)?;
            }
            xml.push_str("</row>");
        }

        xml.push_str("</sheetData></worksheet>");
        Ok(xml)
    }
}

fn write_cell(xml: &mut String, letter: &str, row_number: usize, style: usize, literal: &CellLiteral) -> std::fmt::Result {
    write!(xml, "<c r=\"{}{}\" s=\"{}\"", letter, row_number, style)?;
    if let Some(kind) = literal.storage.type_attribute() {
        write!(xml, " t=\"{}\"", kind)?;
    }
    if literal.text.is_empty() {
        xml.push_str("/>");
    } else if literal.storage == CellStorage::Formula {
        write!(xml, "><f ca=\"1\">{}</f></c>", escape(literal.text.as_str()))?;
    } else {
        write!(xml, "><v>{}</v></c>", escape(literal.text.as_str()))?;
    }
    Ok(())
}

fn generate_empty_worksheet() -> String {
    format!("{XML_DECLARATION}<worksheet xmlns=\"{NS_MAIN}\" xmlns:r=\"{NS_RELATIONSHIPS}\"><sheetData/></worksheet>")
}

fn generate_workbook(sheet_names: &[&str], has_formula: bool) -> Result<String, std::fmt::Error> {
    let mut xml = String::with_capacity(512);
    xml.push_str(XML_DECLARATION);
    write!(xml, "<workbook xmlns=\"{NS_MAIN}\" xmlns:r=\"{NS_RELATIONSHIPS}\"><sheets>")?;
    for (index, name) in sheet_names.iter().enumerate() {
        write!(
            xml,
            "<sheet name=\"{}\" sheetId=\"{}\" r:id=\"rId{}\"/>",
            escape(*name),
            index + 1,
            index + 1
        )?;
    }
    xml.push_str("</sheets>");
    if has_formula {
        // consumers recompute formulas when the workbook is opened
        xml.push_str("<calcPr fullCalcOnLoad=\"1\" forceFullCalc=\"1\"/>");
    }
    xml.push_str("</workbook>");
    Ok(xml)
}

fn generate_workbook_relationships(sheet_count: usize) -> Result<String, std::fmt::Error> {
    let mut xml = String::with_capacity(512);
    xml.push_str(XML_DECLARATION);
    write!(xml, "<Relationships xmlns=\"{NS_PACKAGE_RELATIONSHIPS}\">")?;
    for index in 1..=sheet_count {
        write!(
            xml,
            "<Relationship Id=\"rId{index}\" Type=\"{REL_WORKSHEET}\" Target=\"worksheets/sheet{index}.xml\"/>"
        )?;
    }
    write!(
        xml,
        "<Relationship Id=\"rId{}\" Type=\"{REL_STYLES}\" Target=\"styles.xml\"/>",
        sheet_count + 1
    )?;
    xml.push_str("</Relationships>");
    Ok(xml)
}

fn generate_root_relationships() -> Result<String, std::fmt::Error> {
    let mut xml = String::with_capacity(256);
    xml.push_str(XML_DECLARATION);
    write!(
        xml,
        "<Relationships xmlns=\"{NS_PACKAGE_RELATIONSHIPS}\">\
<Relationship Id=\"rId1\" Type=\"{REL_OFFICE_DOCUMENT}\" Target=\"xl/workbook.xml\"/>\
</Relationships>"
    )?;
    Ok(xml)
}

fn generate_content_types(sheet_count: usize) -> Result<String, std::fmt::Error> {
    let mut xml = String::with_capacity(1024);
    xml.push_str(XML_DECLARATION);
    xml.push_str("<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">");
    xml.push_str("<Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>");
    xml.push_str("<Default Extension=\"xml\" ContentType=\"application/xml\"/>");
    write!(xml, "<Override PartName=\"/xl/workbook.xml\" ContentType=\"{CT_WORKBOOK}\"/>")?;
    write!(xml, "<Override PartName=\"/xl/styles.xml\" ContentType=\"{CT_STYLES}\"/>")?;
    for index in 1..=sheet_count {
        write!(xml, "<Override PartName=\"/xl/worksheets/sheet{index}.xml\" ContentType=\"{CT_WORKSHEET}\"/>")?;
    }
    xml.push_str("</Types>");
    Ok(xml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::zip::ZipHelper;
    use crate::schema::ColumnDescriptor;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;
    use std::io::Read;
    use zip::ZipArchive;

    fn table(name: &str, sheet: &str) -> TableDescriptor {
        TableDescriptor::new(name, sheet, vec![
            ColumnDescriptor::new("COL1", "COl #1", ColumnType::String),
            ColumnDescriptor::new("COL2", "COl #2", ColumnType::Number),
        ]).unwrap()
    }

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut zip = ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
        let mut content = String::new();
        zip.file(name).unwrap().expect(name).read_to_string(&mut content).unwrap();
        content
    }

    fn engine() -> WriteEngine {
        WriteEngine::new(EngineOptions::default()).unwrap()
    }

    #[test]
    fn builder_rejects_second_table_on_same_sheet() {
        let error = WorkbookSpec::builder()
            .add_table(table("First", "Sheet01")).unwrap()
            .add_table(table("Second", "Sheet01"))
            .unwrap_err();
        assert_eq!(error.to_string(), "Sheet 'Sheet01' already exists");
    }

    #[test]
    fn builder_rejects_duplicate_table() {
        let error = WorkbookSpec::builder()
            .add_table(table("First", "Sheet01")).unwrap()
            .add_table(table("First", "Sheet02"))
            .unwrap_err();
        assert!(matches!(error, SheetError::DuplicateTable(name) if name == "First"));
    }

    #[test]
    fn builder_rejects_duplicate_empty_sheet() {
        let builder = WorkbookSpec::builder()
            .add_table(table("First", "Sheet01")).unwrap()
            .add_empty_sheet("Notes").unwrap();
        assert!(matches!(builder.clone().add_empty_sheet("Notes"), Err(SheetError::DuplicateSheet(_))));
        assert!(matches!(builder.clone().add_empty_sheet("Sheet01"), Err(SheetError::DuplicateSheet(_))));

        let spec = builder.add_empty_sheet("Archive").unwrap().build();
        assert_eq!(spec.empty_sheets(), &["Notes".to_owned(), "Archive".to_owned()]);
    }

    #[test]
    fn builder_fill_checks() {
        let builder = WorkbookSpec::builder().add_table(table("First", "Sheet01")).unwrap();
        assert!(matches!(builder.clone().fill_table("Other", vec![]), Err(SheetError::TableNotFound(_))));
        let builder = builder.fill_table("First", vec![]).unwrap();
        assert!(matches!(builder.fill_table("First", vec![]), Err(SheetError::RowsAlreadySupplied(_))));
    }

    #[test]
    fn write_header_and_rows() {
        let rows = vec![
            RowDescriptor::new(1).with_cell("COL1", "a<b").unwrap().with_cell("COL2", 22.5).unwrap(),
            RowDescriptor::new(2).with_cell("COL1", "c").unwrap().with_cell("COL2", Value::Null).unwrap(),
        ];
        let spec = WorkbookSpec::builder()
            .add_table(table("First", "Sheet01")).unwrap()
            .fill_table("First", rows).unwrap()
            .build();
        let bytes = engine().write(&spec).unwrap();
        let sheet = read_part(&bytes, "xl/worksheets/sheet1.xml");

        assert!(sheet.contains(
            "<row r=\"1\"><c r=\"A1\" s=\"2\" t=\"str\"><v>COl #1</v></c><c r=\"B1\" s=\"2\" t=\"str\"><v>COl #2</v></c></row>"
        ));
        assert!(sheet.contains(
            "<row r=\"2\"><c r=\"A2\" s=\"1\" t=\"str\"><v>a&lt;b</v></c><c r=\"B2\" s=\"1\" t=\"n\"><v>22.5</v></c></row>"
        ));
        assert!(sheet.contains("<row r=\"3\"><c r=\"A3\" s=\"1\" t=\"str\"><v>c</v></c><c r=\"B3\" s=\"1\" t=\"n\"/></row>"));

        let workbook = read_part(&bytes, "xl/workbook.xml");
        assert!(workbook.contains("<sheet name=\"Sheet01\" sheetId=\"1\" r:id=\"rId1\"/>"));
        assert!(!workbook.contains("calcPr"));
    }

    #[test]
    fn write_fails_on_missing_value() {
        let rows = vec![RowDescriptor::new(7).with_cell("COL1", "a").unwrap()];
        let spec = WorkbookSpec::builder()
            .add_table(table("First", "Sheet01")).unwrap()
            .fill_table("First", rows).unwrap()
            .build();
        let error = engine().write(&spec).unwrap_err();
        assert_eq!(error.to_string(), "Missing value for column COL2 in table First, row 7");
    }

    #[test]
    fn write_formula_sets_recalculation_flag() {
        let formulas = TableDescriptor::new("FormulaTable", "Sheet02", vec![
            ColumnDescriptor::new("COL1", "ID", ColumnType::Number),
            ColumnDescriptor::new("COL3", "Title", ColumnType::Formula),
        ]).unwrap();
        let rows = vec![
            RowDescriptor::new(1)
                .with_cell("COL1", 1).unwrap()
                .with_cell("COL3", "VLOOKUP($A2,'Sheet01'!$A$1:$Z$1000,2)").unwrap(),
        ];
        let spec = WorkbookSpec::builder()
            .add_table(table("First", "Sheet01")).unwrap()
            .add_table(formulas).unwrap()
            .fill_table("FormulaTable", rows).unwrap()
            .add_empty_sheet("Notes").unwrap()
            .build();
        let bytes = engine().write(&spec).unwrap();

        let workbook = read_part(&bytes, "xl/workbook.xml");
        assert!(workbook.contains("<calcPr fullCalcOnLoad=\"1\" forceFullCalc=\"1\"/>"));
        assert!(workbook.contains("<sheet name=\"Notes\" sheetId=\"3\" r:id=\"rId3\"/>"));

        let sheet = read_part(&bytes, "xl/worksheets/sheet2.xml");
        assert!(sheet.contains("<c r=\"B2\" s=\"1\"><f ca=\"1\">VLOOKUP($A2,&apos;Sheet01&apos;!$A$1:$Z$1000,2)</f></c>"));

        let sheet = read_part(&bytes, "xl/worksheets/sheet1.xml");
        assert!(sheet.contains("<row r=\"1\">"));
        assert!(!sheet.contains("<row r=\"2\">"));

        assert_eq!(read_part(&bytes, "xl/worksheets/sheet3.xml"), generate_empty_worksheet());
    }

    #[test]
    fn write_fails_beyond_column_capacity() {
        let columns = (0..27)
            .map(|index| ColumnDescriptor::new(format!("C{index}"), format!("H{index}"), ColumnType::String))
            .collect();
        let spec = WorkbookSpec::builder()
            .add_table(TableDescriptor::new("Wide", "Sheet01", columns).unwrap()).unwrap()
            .build();
        let error = engine().write(&spec).unwrap_err();
        assert!(matches!(error, SheetError::ColumnCapacityExceeded(26)));
    }

    #[test]
    fn workbook_relationships_list_sheets_then_styles() {
        let xml = generate_workbook_relationships(2).unwrap();
        assert!(xml.contains("Id=\"rId2\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet\" Target=\"worksheets/sheet2.xml\""));
        assert!(xml.contains("Id=\"rId3\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles\" Target=\"styles.xml\""));
    }
}
