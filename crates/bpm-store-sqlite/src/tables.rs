//! Column layout of each record kind's table.

use bpm_core::{
  contract::{Contract, ContractField},
  mapping::{MappingField, PlatformMapping},
  partner::{Partner, PartnerField},
  permission::{DataPermission, PermissionField},
  platform::{Platform, PlatformField},
  record::{Audit, Record},
  store_info::{StoreField, StoreInfo},
};
use rusqlite::types::Value as SqlValue;

use crate::{
  Result,
  encode::{
    RawRow, date, flag, int, opt_date, opt_decimal, opt_dt, opt_int, opt_text,
    status, text,
  },
};

/// A record kind stored in one SQLite table.
///
/// `COLUMNS` lists every column in row order, primary key first, with the
/// four audit columns last. [`Table::to_row`] yields every column except the
/// primary key, in the same order.
pub trait Table: Record {
  const TABLE: &'static str;
  const COLUMNS: &'static [&'static str];

  fn column(field: Self::Field) -> &'static str;

  fn to_row(&self) -> Vec<SqlValue>;

  fn from_row(row: RawRow) -> Result<Self>;
}

const AUDIT_COLUMNS: usize = 4;

fn audit_row(a: &Audit) -> [SqlValue; AUDIT_COLUMNS] {
  [
    opt_dt(a.created_date),
    opt_text(a.created_by.as_deref()),
    opt_dt(a.updated_date),
    opt_text(a.updated_by.as_deref()),
  ]
}

fn read_audit(row: &mut RawRow) -> Result<Audit> {
  Ok(Audit {
    created_date: row.opt_dt()?,
    created_by:   row.opt_text()?,
    updated_date: row.opt_dt()?,
    updated_by:   row.opt_text()?,
  })
}

// ─── bp_master ───────────────────────────────────────────────────────────────

impl Table for Partner {
  const TABLE: &'static str = "bp_master";
  const COLUMNS: &'static [&'static str] = &[
    "bp_id",
    "bp_code",
    "bp_name",
    "bp_type",
    "business_reg_no",
    "representative_name",
    "address",
    "phone_number",
    "email",
    "primary_pf_code",
    "status",
    "erp_usage_fee",
    "commission_rate",
    "created_date",
    "created_by",
    "updated_date",
    "updated_by",
  ];

  fn column(field: PartnerField) -> &'static str {
    match field {
      PartnerField::Id => "bp_id",
      PartnerField::Code => "bp_code",
      PartnerField::Name => "bp_name",
      PartnerField::Type => "bp_type",
      PartnerField::BusinessRegNo => "business_reg_no",
      PartnerField::PrimaryPfCode => "primary_pf_code",
      PartnerField::Status => "status",
    }
  }

  fn to_row(&self) -> Vec<SqlValue> {
    let mut row = vec![
      text(&self.bp_code),
      text(&self.bp_name),
      text(&self.bp_type),
      opt_text(self.business_reg_no.as_deref()),
      opt_text(self.representative_name.as_deref()),
      opt_text(self.address.as_deref()),
      opt_text(self.phone_number.as_deref()),
      opt_text(self.email.as_deref()),
      opt_text(self.primary_pf_code.as_deref()),
      status(self.status),
      opt_decimal(self.erp_usage_fee),
      opt_decimal(self.commission_rate),
    ];
    row.extend(audit_row(&self.audit));
    row
  }

  fn from_row(mut row: RawRow) -> Result<Self> {
    Ok(Self {
      bp_id:               Some(row.int()?),
      bp_code:             row.text()?,
      bp_name:             row.text()?,
      bp_type:             row.text()?,
      business_reg_no:     row.opt_text()?,
      representative_name: row.opt_text()?,
      address:             row.opt_text()?,
      phone_number:        row.opt_text()?,
      email:               row.opt_text()?,
      primary_pf_code:     row.opt_text()?,
      status:              row.status()?,
      erp_usage_fee:       row.opt_decimal()?,
      commission_rate:     row.opt_decimal()?,
      audit:               read_audit(&mut row)?,
    })
  }
}

// ─── pf_code_master ──────────────────────────────────────────────────────────

impl Table for Platform {
  const TABLE: &'static str = "pf_code_master";
  const COLUMNS: &'static [&'static str] = &[
    "pf_id",
    "pf_code",
    "pf_name",
    "pf_description",
    "has_master_data",
    "can_own_stores",
    "can_franchise",
    "billing_capable",
    "status",
    "created_date",
    "created_by",
    "updated_date",
    "updated_by",
  ];

  fn column(field: PlatformField) -> &'static str {
    match field {
      PlatformField::Id => "pf_id",
      PlatformField::Code => "pf_code",
      PlatformField::Name => "pf_name",
      PlatformField::HasMasterData => "has_master_data",
      PlatformField::CanOwnStores => "can_own_stores",
      PlatformField::CanFranchise => "can_franchise",
      PlatformField::BillingCapable => "billing_capable",
      PlatformField::Status => "status",
    }
  }

  fn to_row(&self) -> Vec<SqlValue> {
    let mut row = vec![
      text(&self.pf_code),
      text(&self.pf_name),
      opt_text(self.pf_description.as_deref()),
      flag(self.has_master_data),
      flag(self.can_own_stores),
      flag(self.can_franchise),
      flag(self.billing_capable),
      status(self.status),
    ];
    row.extend(audit_row(&self.audit));
    row
  }

  fn from_row(mut row: RawRow) -> Result<Self> {
    Ok(Self {
      pf_id:           Some(row.int()?),
      pf_code:         row.text()?,
      pf_name:         row.text()?,
      pf_description:  row.opt_text()?,
      has_master_data: row.flag()?,
      can_own_stores:  row.flag()?,
      can_franchise:   row.flag()?,
      billing_capable: row.flag()?,
      status:          row.status()?,
      audit:           read_audit(&mut row)?,
    })
  }
}

// ─── bp_contract_info ────────────────────────────────────────────────────────

impl Table for Contract {
  const TABLE: &'static str = "bp_contract_info";
  const COLUMNS: &'static [&'static str] = &[
    "contract_id",
    "contract_code",
    "contractor_bp_id",
    "contractee_bp_id",
    "contract_type",
    "pf_id",
    "contract_start_date",
    "contract_end_date",
    "contract_terms",
    "fee_rate",
    "status",
    "created_date",
    "created_by",
    "updated_date",
    "updated_by",
  ];

  fn column(field: ContractField) -> &'static str {
    match field {
      ContractField::Id => "contract_id",
      ContractField::Code => "contract_code",
      ContractField::ContractorBpId => "contractor_bp_id",
      ContractField::ContracteeBpId => "contractee_bp_id",
      ContractField::Type => "contract_type",
      ContractField::PfId => "pf_id",
      ContractField::StartDate => "contract_start_date",
      ContractField::EndDate => "contract_end_date",
      ContractField::Status => "status",
    }
  }

  fn to_row(&self) -> Vec<SqlValue> {
    let mut row = vec![
      text(&self.contract_code),
      int(self.contractor_bp_id),
      int(self.contractee_bp_id),
      text(&self.contract_type),
      int(self.pf_id),
      date(self.contract_start_date),
      opt_date(self.contract_end_date),
      opt_text(self.contract_terms.as_deref()),
      opt_decimal(self.fee_rate),
      status(self.status),
    ];
    row.extend(audit_row(&self.audit));
    row
  }

  fn from_row(mut row: RawRow) -> Result<Self> {
    Ok(Self {
      contract_id:         Some(row.int()?),
      contract_code:       row.text()?,
      contractor_bp_id:    row.int()?,
      contractee_bp_id:    row.int()?,
      contract_type:       row.text()?,
      pf_id:               row.int()?,
      contract_start_date: row.date()?,
      contract_end_date:   row.opt_date()?,
      contract_terms:      row.opt_text()?,
      fee_rate:            row.opt_decimal()?,
      status:              row.status()?,
      audit:               read_audit(&mut row)?,
    })
  }
}

// ─── bp_store_info ───────────────────────────────────────────────────────────

impl Table for StoreInfo {
  const TABLE: &'static str = "bp_store_info";
  const COLUMNS: &'static [&'static str] = &[
    "store_id",
    "store_code",
    "bp_id",
    "store_name",
    "store_type",
    "address",
    "phone_number",
    "manager_name",
    "opening_date",
    "closing_date",
    "status",
    "created_date",
    "created_by",
    "updated_date",
    "updated_by",
  ];

  fn column(field: StoreField) -> &'static str {
    match field {
      StoreField::Id => "store_id",
      StoreField::Code => "store_code",
      StoreField::BpId => "bp_id",
      StoreField::Name => "store_name",
      StoreField::Type => "store_type",
      StoreField::Address => "address",
      StoreField::ManagerName => "manager_name",
      StoreField::OpeningDate => "opening_date",
      StoreField::ClosingDate => "closing_date",
      StoreField::Status => "status",
    }
  }

  fn to_row(&self) -> Vec<SqlValue> {
    let mut row = vec![
      text(&self.store_code),
      int(self.bp_id),
      text(&self.store_name),
      opt_text(self.store_type.as_deref()),
      opt_text(self.address.as_deref()),
      opt_text(self.phone_number.as_deref()),
      opt_text(self.manager_name.as_deref()),
      opt_date(self.opening_date),
      opt_date(self.closing_date),
      status(self.status),
    ];
    row.extend(audit_row(&self.audit));
    row
  }

  fn from_row(mut row: RawRow) -> Result<Self> {
    Ok(Self {
      store_id:     Some(row.int()?),
      store_code:   row.text()?,
      bp_id:        row.int()?,
      store_name:   row.text()?,
      store_type:   row.opt_text()?,
      address:      row.opt_text()?,
      phone_number: row.opt_text()?,
      manager_name: row.opt_text()?,
      opening_date: row.opt_date()?,
      closing_date: row.opt_date()?,
      status:       row.status()?,
      audit:        read_audit(&mut row)?,
    })
  }
}

// ─── bp_pf_mapping ───────────────────────────────────────────────────────────

impl Table for PlatformMapping {
  const TABLE: &'static str = "bp_pf_mapping";
  const COLUMNS: &'static [&'static str] = &[
    "mapping_id",
    "bp_id",
    "pf_id",
    "target_bp_id",
    "parent_bp_id",
    "mapping_type",
    "effective_date",
    "expiry_date",
    "status",
    "created_date",
    "created_by",
    "updated_date",
    "updated_by",
  ];

  fn column(field: MappingField) -> &'static str {
    match field {
      MappingField::Id => "mapping_id",
      MappingField::BpId => "bp_id",
      MappingField::PfId => "pf_id",
      MappingField::TargetBpId => "target_bp_id",
      MappingField::ParentBpId => "parent_bp_id",
      MappingField::Type => "mapping_type",
      MappingField::EffectiveDate => "effective_date",
      MappingField::ExpiryDate => "expiry_date",
      MappingField::Status => "status",
    }
  }

  fn to_row(&self) -> Vec<SqlValue> {
    let mut row = vec![
      int(self.bp_id),
      int(self.pf_id),
      opt_int(self.target_bp_id),
      opt_int(self.parent_bp_id),
      text(&self.mapping_type),
      date(self.effective_date),
      opt_date(self.expiry_date),
      status(self.status),
    ];
    row.extend(audit_row(&self.audit));
    row
  }

  fn from_row(mut row: RawRow) -> Result<Self> {
    Ok(Self {
      mapping_id:     Some(row.int()?),
      bp_id:          row.int()?,
      pf_id:          row.int()?,
      target_bp_id:   row.opt_int()?,
      parent_bp_id:   row.opt_int()?,
      mapping_type:   row.text()?,
      effective_date: row.date()?,
      expiry_date:    row.opt_date()?,
      status:         row.status()?,
      audit:          read_audit(&mut row)?,
    })
  }
}

// ─── bp_master_data_permission ───────────────────────────────────────────────

impl Table for DataPermission {
  const TABLE: &'static str = "bp_master_data_permission";
  const COLUMNS: &'static [&'static str] = &[
    "permission_id",
    "owner_bp_id",
    "user_bp_id",
    "data_type",
    "permission_type",
    "effective_date",
    "expiry_date",
    "status",
    "created_date",
    "created_by",
    "updated_date",
    "updated_by",
  ];

  fn column(field: PermissionField) -> &'static str {
    match field {
      PermissionField::Id => "permission_id",
      PermissionField::OwnerBpId => "owner_bp_id",
      PermissionField::UserBpId => "user_bp_id",
      PermissionField::DataType => "data_type",
      PermissionField::PermissionType => "permission_type",
      PermissionField::EffectiveDate => "effective_date",
      PermissionField::ExpiryDate => "expiry_date",
      PermissionField::Status => "status",
    }
  }

  fn to_row(&self) -> Vec<SqlValue> {
    let mut row = vec![
      int(self.owner_bp_id),
      int(self.user_bp_id),
      text(&self.data_type),
      text(&self.permission_type),
      date(self.effective_date),
      opt_date(self.expiry_date),
      status(self.status),
    ];
    row.extend(audit_row(&self.audit));
    row
  }

  fn from_row(mut row: RawRow) -> Result<Self> {
    Ok(Self {
      permission_id:   Some(row.int()?),
      owner_bp_id:     row.int()?,
      user_bp_id:      row.int()?,
      data_type:       row.text()?,
      permission_type: row.text()?,
      effective_date:  row.date()?,
      expiry_date:     row.opt_date()?,
      status:          row.status()?,
      audit:           read_audit(&mut row)?,
    })
  }
}
