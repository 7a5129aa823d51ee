// libs/appointment-cell/src/services/binding.rs
use std::sync::Arc;

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use schedule_cell::models::RangeQuery;
use schedule_cell::store::{AppointmentStore, SlotStore, SupabaseScheduleStore};
use shared_config::AppConfig;
use shared_models::appointment::{AppointmentStatus, MedicalAppointment, NewMedicalAppointment, StatusTaxonomy};

use crate::models::{AppointmentError, AppointmentResult, CreateAppointmentFromSlotRequest, DeletedAppointment};

/// Keeps slot availability in step with the appointments booked on them.
#[derive(Clone)]
pub struct SlotBindingService {
    slots: Arc<dyn SlotStore>,
    appointments: Arc<dyn AppointmentStore>,
    taxonomy: StatusTaxonomy,
}

impl SlotBindingService {
    pub fn new(config: &AppConfig, auth_token: Option<&str>) -> Self {
        let store = Arc::new(SupabaseScheduleStore::new(config, auth_token));
        Self::with_store(store, StatusTaxonomy::from_config(config))
    }

    pub fn with_store<S>(store: Arc<S>, taxonomy: StatusTaxonomy) -> Self
    where
        S: SlotStore + AppointmentStore + 'static,
    {
        Self {
            slots: store.clone(),
            appointments: store,
            taxonomy,
        }
    }

    /// Book a slot. The slot is claimed with a single conditional update, so
    /// of two concurrent bookings exactly one gets the slot.
    pub async fn create_from_slot(&self, request: CreateAppointmentFromSlotRequest) -> AppointmentResult<MedicalAppointment> {
        let slot_id = request.time_slot_id;
        debug!("Booking slot {} for patient {}", slot_id, request.patient_id);

        let slot = match self.slots.flip_availability(slot_id, false).await? {
            Some(slot) => slot,
            None => {
                return Err(match self.slots.get_slot(slot_id).await? {
                    Some(_) => AppointmentError::SlotNotAvailable(slot_id),
                    None => AppointmentError::SlotNotFound(slot_id),
                });
            }
        };

        let appointment = NewMedicalAppointment {
            hospital_id: slot.hospital_id,
            patient_id: request.patient_id,
            doctor_id: slot.doctor_id,
            status_id: request
                .status_id
                .unwrap_or_else(|| self.taxonomy.id_of(AppointmentStatus::Waiting)),
            appointment_date: slot.slot_date,
            appointment_time: slot.slot_time,
            medical_record_id: request.medical_record_id,
            time_slot_id: Some(slot.id),
        };

        match self.appointments.insert_appointment(&appointment).await {
            Ok(created) => {
                info!("Appointment {} booked on slot {}", created.id, slot_id);
                Ok(created)
            }
            Err(e) => {
                if let Err(release_err) = self.slots.flip_availability(slot_id, true).await {
                    error!("Failed to release slot {} after insert error: {}", slot_id, release_err);
                }
                Err(AppointmentError::Store(e))
            }
        }
    }

    /// Delete an appointment, releasing its slot first when one can be found.
    /// A cancelled appointment already gave its slot back, and the slot may
    /// belong to a newer booking by now, so it is left untouched.
    pub async fn delete_appointment(
        &self,
        appointment_id: Uuid,
    ) -> AppointmentResult<DeletedAppointment> {
        let appointment = self.load(appointment_id).await?;
        let status = self.taxonomy.status_of(appointment.status_id);
        let released_slot_id = if status == AppointmentStatus::Cancelled {
            debug!("Appointment {} is cancelled; its slot was already released", appointment_id);
            None
        } else {
            self.release_slot(&appointment).await?
        };

        if !self.appointments.delete_appointment(appointment_id).await? {
            warn!("Appointment {} was already gone when deleting", appointment_id);
        }
        info!("Deleted appointment {}", appointment_id);

        Ok(DeletedAppointment {
            appointment_id,
            released_slot_id,
        })
    }

    /// Mark an appointment cancelled and release its slot. Cancelling twice
    /// returns the appointment unchanged.
    pub async fn cancel_appointment(&self, appointment_id: Uuid) -> AppointmentResult<MedicalAppointment> {
        let appointment = self.load(appointment_id).await?;
        if self.taxonomy.status_of(appointment.status_id) == AppointmentStatus::Cancelled {
            return Ok(appointment);
        }

        let cancelled = self
            .appointments
            .update_appointment_status(appointment_id, self.taxonomy.id_of(AppointmentStatus::Cancelled))
            .await?
            .ok_or(AppointmentError::NotFound(appointment_id))?;

        self.release_slot(&cancelled).await?;
        info!("Cancelled appointment {}", appointment_id);
        Ok(cancelled)
    }

    async fn load(&self, appointment_id: Uuid) -> AppointmentResult<MedicalAppointment> {
        self.appointments
            .get_appointment(appointment_id)
            .await?
            .ok_or(AppointmentError::NotFound(appointment_id))
    }

    /// Release the bound slot. Appointments booked before `time_slot_id`
    /// existed are matched by a booked slot whose window holds their time.
    async fn release_slot(
        &self,
        appointment: &MedicalAppointment,
    ) -> AppointmentResult<Option<Uuid>> {
        let slot_id = match appointment.time_slot_id {
            Some(slot_id) => slot_id,
            None => {
                let query = RangeQuery::for_doctor(
                    appointment.doctor_id,
                    appointment.appointment_date,
                    appointment.appointment_date,
                );
                let candidates = self.slots.list_slots(&query).await?;
                match candidates
                    .iter()
                    .find(|slot| !slot.is_available && slot.contains(appointment.appointment_time))
                {
                    Some(slot) => slot.id,
                    None => {
                        debug!("No booked slot matches appointment {}", appointment.id);
                        return Ok(None);
                    }
                }
            }
        };

        let released = self.slots.flip_availability(slot_id, true).await?;
        Ok(released.map(|slot| slot.id))
    }
}
